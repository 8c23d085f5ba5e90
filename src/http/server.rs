//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the public and editor Axum routers
//! - Wire up middleware (tracing, limits, request ID, security headers)
//! - Bind both listeners and shut them down together
//! - Swap in reloaded configuration without dropping connections

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::http::{header, HeaderValue};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{setup_admin_router, AccountRegistry};
use crate::config::SiteConfig;
use crate::http::{public, request};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::HostResolver;
use crate::website::WebsiteStore;

/// Config-derived state, replaced wholesale on reload.
pub struct InnerState {
    pub config: SiteConfig,
    pub resolver: HostResolver,
    pub accounts: AccountRegistry,
}

impl InnerState {
    pub fn from_config(config: SiteConfig) -> Self {
        Self {
            resolver: HostResolver::from_config(&config.hosts),
            accounts: AccountRegistry::from_config(&config.accounts),
            config,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub store: WebsiteStore,
}

impl AppState {
    pub fn new(config: SiteConfig, store: WebsiteStore) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(InnerState::from_config(config))),
            store,
        }
    }

    /// Replace the config-derived state. Listener addresses are bound once
    /// and are not affected.
    pub fn apply_config(&self, config: SiteConfig) {
        let accounts = config.accounts.len();
        self.inner.store(Arc::new(InnerState::from_config(config)));
        metrics::record_config_reload();
        tracing::info!(accounts, "Configuration reloaded");
    }
}

/// Public site server, plus the editor API when enabled.
pub struct HttpServer {
    state: AppState,
    config: SiteConfig,
}

impl HttpServer {
    pub fn new(config: SiteConfig, store: WebsiteStore) -> Self {
        let state = AppState::new(config.clone(), store);
        Self { state, config }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn build_public_router(config: &SiteConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(public::show_home))
            .route("/{*path}", get(public::show_path));
        if config.hosts.debug_endpoint {
            router = router.route("/debug_subdomain", get(public::debug_subdomain));
        }
        Self::apply_layers(config, router.with_state(state))
    }

    /// Layers shared by both listeners. The last layer added runs first.
    #[allow(deprecated)]
    fn apply_layers(config: &SiteConfig, mut router: Router) -> Router {
        router = router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ));
        }

        router
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
            .layer(request::set_request_id_layer())
    }

    /// Serve until `shutdown` fires. Config updates received on
    /// `config_updates` are applied as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        let admin_task = if self.config.admin.enabled {
            let admin_listener = TcpListener::bind(&self.config.admin.bind_address).await?;
            let admin_addr = admin_listener.local_addr()?;
            let admin_router =
                Self::apply_layers(&self.config, setup_admin_router(self.state.clone()));
            let mut admin_shutdown = shutdown.clone();

            tracing::info!(address = %admin_addr, "Editor API starting");
            Some(tokio::spawn(async move {
                axum::serve(
                    admin_listener,
                    admin_router.into_make_service_with_connect_info::<SocketAddr>(),
                )
                .with_graceful_shutdown(async move { admin_shutdown.recv().await })
                .await
            }))
        } else {
            None
        };

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.apply_config(config);
            }
        });

        let app = Self::build_public_router(&self.config, self.state.clone());
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Draining public listener");
            })
            .await?;

        if let Some(task) = admin_task {
            match task.await {
                Ok(result) => result?,
                Err(e) => tracing::error!(error = %e, "Editor API task failed"),
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
