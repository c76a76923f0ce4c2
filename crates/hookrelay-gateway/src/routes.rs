//! API route handlers for the gateway.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::Json;
use tracing::Instrument;

use super::response::{preflight, render};
use super::server::AppState;

/// Inbound webhook. The raw body is decoded by the relay so malformed JSON
/// gets the relay's own 500 body instead of an extractor rejection.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("webhook", %request_id, bytes = body.len());
    let status = state.relay.respond(&body).instrument(span).await;
    render(&method, &status)
}

/// CORS preflight for the webhook routes.
pub async fn webhook_preflight(headers: HeaderMap) -> Response {
    preflight(&headers)
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "hookrelay-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Relay information, with secrets left out.
pub async fn system_info(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let config = state.relay.config();
    let endpoint = config.selected_destination().ok();
    let filter = config.filter.as_ref();

    Json(serde_json::json!({
        "name": "HookRelay",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "destination": {
            "name": config.destination,
            "url": endpoint.map(|e| e.url.as_str()),
            "template": endpoint.map(|e| e.template.as_str()),
        },
        "optimal_hour": config.optimal_hour,
        "filter": {
            "name": filter.and_then(|f| f.name()),
            "segment": filter.and_then(|f| f.segment()),
        },
    }))
}
