//! Liveness and metrics endpoints.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::metrics::collect_metrics;
use crate::state::AppState;

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /metrics` in Prometheus text format.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = collect_metrics(&state).await;
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
