//! Router assembly and server lifecycle.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db;
use crate::handlers;
use crate::state::AppState;

/// Builds the router with every route wired to `state`.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Service endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Partner auth
        .route("/api/auth/partner/signup", post(handlers::sign_up))
        .route("/api/auth/partner/signin", post(handlers::sign_in))
        .route("/api/auth/partner/signout", post(handlers::sign_out))
        // Partner profile
        .route(
            "/api/partner/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        // Location search
        .route("/api/locations/search", get(handlers::search_locations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct MandapServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    #[must_use]
    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Connects the database pool and assembles the application.
    ///
    /// # Errors
    ///
    /// Returns an error when the pool cannot be established.
    pub async fn build(self) -> anyhow::Result<MandapServer> {
        let pool = db::create_pool(&self.config.database).await?;
        let state = AppState::new(&self.config, pool);
        let app = build_app(state);

        Ok(MandapServer {
            addr: self.addr,
            app,
        })
    }
}

impl MandapServer {
    /// Serves until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the listener or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
