//! HTTP API Route Definitions

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{self, AppState};

/// Create the API router with all routes
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/crawl", post(handlers::crawl))
        .route("/submit-url", post(handlers::submit_url))
        .route("/proxy", post(handlers::proxy))
        .route("/search", post(handlers::search))
        .route("/suggest", get(handlers::suggest))
        .route("/stats", get(handlers::stats))
        .with_state(app_state)
}
