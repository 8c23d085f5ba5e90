//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HOST};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use sitehost::config::{AccountConfig, SiteConfig};
use sitehost::http::HttpServer;
use sitehost::lifecycle::Shutdown;
use sitehost::website::{AccountId, Website, WebsiteInput, WebsiteStore};

pub const ALICE_KEY: &str = "alice-key";
pub const BOB_KEY: &str = "bob-key";

/// A running server on fixed loopback ports.
pub struct TestSite {
    pub public: SocketAddr,
    pub admin: SocketAddr,
    pub store: WebsiteStore,
    pub config: SiteConfig,
    pub config_tx: mpsc::UnboundedSender<SiteConfig>,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

pub fn test_config(public_port: u16, admin_port: u16) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listener.bind_address = format!("127.0.0.1:{}", public_port);
    config.admin.bind_address = format!("127.0.0.1:{}", admin_port);
    config.accounts = vec![
        AccountConfig { id: "alice".into(), api_key: ALICE_KEY.into() },
        AccountConfig { id: "bob".into(), api_key: BOB_KEY.into() },
    ];
    config
}

/// Start the server with `config` and wait until it accepts connections.
pub async fn start_site(config: SiteConfig) -> TestSite {
    let public: SocketAddr = config.listener.bind_address.parse().unwrap();
    let admin: SocketAddr = config.admin.bind_address.parse().unwrap();

    let store = WebsiteStore::new(None);
    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config.clone(), store.clone());
    let listener = tokio::net::TcpListener::bind(public).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestSite { public, admin, store, config, config_tx, shutdown, client }
}

impl TestSite {
    /// Public request addressed to `host`.
    pub fn public_get(&self, host: &str, path: &str) -> RequestBuilder {
        self.client
            .get(format!("http://{}{}", self.public, path))
            .header(HOST, host)
    }

    /// Editor API request, authenticated when `key` is given.
    pub fn admin(&self, method: Method, path: &str, key: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("http://{}{}", self.admin, path));
        match key {
            Some(key) => builder.header(AUTHORIZATION, format!("Bearer {}", key)),
            None => builder,
        }
    }

    /// Seed a website for `owner` directly through the store.
    pub fn seed(&self, owner: &str, name: &str, domain: &str, published: bool) -> Website {
        self.store
            .create(
                &AccountId::new(owner),
                WebsiteInput {
                    name: Some(name.into()),
                    domain_name: Some(domain.into()),
                    published: Some(published),
                    content: Some(sample_content()),
                    pages: None,
                },
            )
            .unwrap()
    }
}

pub fn sample_content() -> Value {
    json!({
        "pages": [
            { "name": "About", "slug": "/about", "position": 2, "content": "<p>About us</p>" },
            { "name": "Home", "slug": "/", "position": 1, "content": "<h1>Welcome</h1>" },
            { "name": "Team", "slug": "/about/team", "position": 3, "content": "<p>The team</p>" }
        ]
    })
}
