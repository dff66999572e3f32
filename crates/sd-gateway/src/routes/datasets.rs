//! Dataset views: interaction log and knowledge summary, both read from
//! the local store.

use axum::Json;
use axum::extract::State;

use sd_protocol::{FaqSummary, InteractionRecord};

use crate::state::AppState;

/// `GET /api/logs` — the full interaction log.
pub async fn logs(State(state): State<AppState>) -> Json<Vec<InteractionRecord>> {
    Json(state.pipeline.log().read_all().await)
}

/// `GET /api/faqs` — count, leading ids, and a small sample of the
/// knowledge base.
pub async fn faqs(State(state): State<AppState>) -> Json<FaqSummary> {
    Json(state.pipeline.faq_summary().await)
}
