pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as application_handlers;
use crate::matching::handlers as matching_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/match/assess",
            post(matching_handlers::handle_assess),
        )
        .route("/api/v1/match/batch", post(matching_handlers::handle_batch))
        // Applications API
        .route(
            "/api/v1/applications/:id",
            get(application_handlers::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(application_handlers::handle_update_status),
        )
        .with_state(state)
}
