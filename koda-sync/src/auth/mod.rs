//! Sync API authentication
//!
//! Server-side jobs call the queue API with a shared service credential in
//! the `Authorization: Bearer` header. End-customer traffic never reaches
//! these routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;

use crate::state::AppState;

/// Middleware that verifies the bearer token against the configured
/// service credential.
pub async fn sync_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    if token != state.sync_api_token {
        tracing::warn!("Sync API call with invalid token");
        return Err(AppError::invalid_token("Invalid sync API token").into_response());
    }

    Ok(next.run(request).await)
}
