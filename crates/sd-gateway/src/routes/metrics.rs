//! Deflection metrics endpoint.

use axum::Json;
use axum::extract::State;

use sd_protocol::MetricsReport;

use crate::state::AppState;

/// `GET /api/metrics` — remote-first so the report covers provider-side
/// interactions; falls back to aggregating the local log.
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    match state.bridge.metrics().await {
        Ok(report) => Json(report),
        Err(e) => {
            tracing::warn!(error = %e, "provider unavailable, aggregating locally");
            Json(state.pipeline.metrics().await)
        }
    }
}
