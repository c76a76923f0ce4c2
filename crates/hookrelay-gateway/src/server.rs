//! Gateway server: shared state, router, and listener lifecycle.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use hookrelay_core::config::ServerConfig;
use hookrelay_core::error::Result;
use hookrelay_pipeline::Relay;
use tower_http::trace::TraceLayer;

use crate::routes;

/// State shared by every handler. Nothing in it is mutated per request.
pub struct AppState {
    pub relay: Relay,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self { relay, start_time: Instant::now() }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/post", post(routes::webhook).options(routes::webhook_preflight))
        .route("/webhook", post(routes::webhook).options(routes::webhook_preflight))
        .route("/health", get(routes::health_check))
        .route("/api/v1/info", get(routes::system_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HookRelay listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
