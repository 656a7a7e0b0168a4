//! HTTP surface: a single `POST /cluster` endpoint plus a health check.

mod cors;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{ConfigError, ServerConfig};

pub use self::cors::build_cors_layer;
pub use self::models::{ClusterResponse, HealthResponse};

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Build the application router for `state`.
pub fn router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(&state.config.cors)?;
    let body_limit = state.config.max_upload_bytes;
    Ok(Router::new()
        .route("/cluster", post(handlers::cluster))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    if config.cors.allows_any_origin() {
        warn!("CORS allows every origin; restrict [cors] allow_origins for production");
    }
    let app = router(Arc::new(AppState::new(config)))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
