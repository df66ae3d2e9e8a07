use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, instrument};

use super::middleware::bearer_token;
use super::types::{SessionResponse, SignInRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for signing in
///
/// POST /session
/// Stores the HipChat token and returns a JWT for subsequent requests.
/// Replacing the token of an existing username requires that account's
/// session in the Authorization header.
#[instrument(name = "sign_in", skip(state, headers, request))]
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    info!(username = %request.username, "Signing in");

    let current = match bearer_token(&headers)? {
        Some(token) => Some(state.session_service.validate_session(token).await?),
        None => None,
    };

    let session = state
        .session_service
        .sign_in(request, current.as_ref())
        .await?;

    info!(username = %session.username, "Session created successfully");

    Ok(Json(session))
}
