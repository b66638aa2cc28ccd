use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))

        // Exports
        .route("/api/v1/exports", post(handlers::start_export))
        .route("/api/v1/exports/{export_id}", get(handlers::get_export_status))
        .route("/api/v1/exports/{export_id}/cancel", post(handlers::cancel_export))

        .with_state(state)
}
