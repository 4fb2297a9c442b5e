//! API routes

use axum::{routing::get, Router};

use super::handlers::{self, AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))

        // Request log metrics
        .route("/api/v1/metrics/overview", get(handlers::get_overview))
        .route("/api/v1/metrics/entries", get(handlers::get_entries))

        // Self-monitoring
        .route("/metrics", get(handlers::prometheus_metrics))

        .with_state(state)
}
