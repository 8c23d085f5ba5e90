//! Multi-tenant website host.
//!
//! Serves every account's website from its own subdomain and exposes an
//! editor API for owners to manage their site and its pages.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (Host: acme.localhost)
//!         → http::server (public listener, layers)
//!         → routing::host (Host header → tenant label)
//!         → site::lookup (label → website → page)
//!         → site::render (page → HTML)
//!
//!     Editor Request (Authorization: Bearer <key>)
//!         → http::server (admin listener, layers)
//!         → admin::auth (key → account)
//!         → admin::handlers → website::store (validate, persist)
//!
//!     Cross-cutting: config (load, validate, hot reload),
//!     observability (logging, metrics), lifecycle (startup, shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use sitehost::config::{load_config, ConfigWatcher, SiteConfig};
use sitehost::lifecycle::{signals, startup, Shutdown};
use sitehost::observability::{logging, metrics};
use sitehost::HttpServer;

#[derive(Parser)]
#[command(name = "sitehost")]
#[command(about = "Multi-tenant website host", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sitehost starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        admin_enabled = config.admin.enabled,
        accounts = config.accounts.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = startup::open_store(&config)?;
    metrics::record_websites(store.len());
    tracing::info!(websites = store.len(), "Website store ready");

    // The watcher must outlive the server for reloads to keep arriving.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let mut server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = signals::shutdown_on_signal(&shutdown) => {}
    }

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
