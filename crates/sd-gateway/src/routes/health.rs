//! Liveness probe.

use axum::Json;
use serde_json::json;

/// `GET /health`.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "sd-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
