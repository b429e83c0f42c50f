//! API routes for koda-sync

pub mod health;
pub mod queue;

use crate::auth::sync_auth_middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Queue API (service-credential authenticated)
    let sync = Router::new()
        .route("/api/sync/queue", post(queue::handle_action))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            sync_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(sync)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
