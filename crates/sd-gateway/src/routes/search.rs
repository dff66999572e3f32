//! Retrieval endpoints: knowledge search and cross-source similarity.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use sd_protocol::SimilarResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const SEARCH_DEFAULT_TOP_K: usize = 5;
const SEARCH_MAX_TOP_K: usize = 20;
const SIMILAR_DEFAULT_TOP_K: usize = 10;
const SIMILAR_MAX_TOP_K: usize = 30;

#[derive(Debug, Deserialize)]
pub struct RetrievalQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
}

impl RetrievalQuery {
    fn query(&self) -> ApiResult<&str> {
        let q = self.q.trim();
        if q.is_empty() {
            return Err(ApiError::BadRequest("q must not be empty".into()));
        }
        Ok(q)
    }

    fn top_k(&self, default: usize, max: usize) -> usize {
        self.top_k.unwrap_or(default).min(max)
    }
}

/// `GET /api/search?q&topK` — knowledge-only retrieval, remote-first with
/// local fallback.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<RetrievalQuery>,
) -> ApiResult<Json<SimilarResult>> {
    let q = params.query()?;
    let top_k = params.top_k(SEARCH_DEFAULT_TOP_K, SEARCH_MAX_TOP_K);

    match state.bridge.search(q, top_k).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::warn!(error = %e, "provider unavailable, searching locally");
            Ok(Json(state.pipeline.search(q, top_k).await))
        }
    }
}

/// `GET /api/similar?q&topK` — merged knowledge + history similarity over
/// the local datasets.
pub async fn similar(
    State(state): State<AppState>,
    Query(params): Query<RetrievalQuery>,
) -> ApiResult<Json<SimilarResult>> {
    let q = params.query()?;
    let top_k = params.top_k(SIMILAR_DEFAULT_TOP_K, SIMILAR_MAX_TOP_K);
    Ok(Json(state.pipeline.similar(q, top_k).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_clamps_to_endpoint_maximum() {
        let params = RetrievalQuery {
            q: "vpn".into(),
            top_k: Some(500),
        };
        assert_eq!(params.top_k(SEARCH_DEFAULT_TOP_K, SEARCH_MAX_TOP_K), 20);
        assert_eq!(params.top_k(SIMILAR_DEFAULT_TOP_K, SIMILAR_MAX_TOP_K), 30);
    }

    #[test]
    fn top_k_defaults_per_endpoint() {
        let params = RetrievalQuery {
            q: "vpn".into(),
            top_k: None,
        };
        assert_eq!(params.top_k(SEARCH_DEFAULT_TOP_K, SEARCH_MAX_TOP_K), 5);
        assert_eq!(params.top_k(SIMILAR_DEFAULT_TOP_K, SIMILAR_MAX_TOP_K), 10);
    }

    #[test]
    fn whitespace_query_is_rejected() {
        let params = RetrievalQuery {
            q: "   ".into(),
            top_k: None,
        };
        assert!(params.query().is_err());
    }
}
