//! Question answering endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use sd_pipeline::AskOrigin;
use sd_protocol::AskResponse;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskBody {
    #[serde(default)]
    pub question: String,
}

/// `POST /api/ask` — remote-first; answers locally when the provider is
/// unavailable so the endpoint keeps working without it.
pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskBody>,
) -> ApiResult<Json<AskResponse>> {
    let question = body.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".into()));
    }

    match state.bridge.ask(question).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!(error = %e, "provider unavailable, answering locally");
            Ok(Json(state.pipeline.ask(question, AskOrigin::Local).await))
        }
    }
}
