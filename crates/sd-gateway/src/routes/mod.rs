//! API route definitions and router builder.

pub mod ask;
pub mod classify;
pub mod datasets;
pub mod health;
pub mod metrics;
pub mod search;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/ask", post(ask::ask))
        .route("/classify", post(classify::classify))
        .route("/search", get(search::search))
        .route("/similar", get(search::similar))
        .route("/faqs", get(datasets::faqs))
        .route("/logs", get(datasets::logs))
        .route("/metrics", get(metrics::metrics));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
