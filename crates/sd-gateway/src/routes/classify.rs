//! Intent classification endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use sd_protocol::IntentResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyBody {
    #[serde(default)]
    pub text: String,
}

/// `POST /api/classify` — remote only; a 503 here tells the caller the
/// tool provider is down rather than silently serving a different engine.
pub async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyBody>,
) -> ApiResult<Json<IntentResult>> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }

    match state.bridge.classify(text).await {
        Ok(intent) => Ok(Json(intent)),
        Err(e) => {
            tracing::warn!(error = %e, "classify rejected, provider unavailable");
            Err(ApiError::Upstream("tool provider unavailable".into()))
        }
    }
}
