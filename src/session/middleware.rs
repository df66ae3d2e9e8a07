use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, instrument, warn};

use crate::shared::{AppError, AppState};

/// Extracts the token from an `Authorization: Bearer` header.
///
/// Returns `Ok(None)` when no Authorization header was sent at all.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(Some)
        .ok_or_else(|| {
            warn!("Invalid Authorization header format (expected Bearer token)");
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })
}

/// JWT authentication middleware - validates the Authorization Bearer header and adds
/// AuthenticatedUser to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(user): Extension<AuthenticatedUser>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "JWT authentication middleware triggered");

    let token = bearer_token(req.headers())?.ok_or_else(|| {
        warn!("Missing Authorization header in request");
        AppError::Unauthorized("Missing authorization header".to_string())
    })?;

    let user = match state.session_service.validate_session(token).await {
        Ok(user) => user,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(
        username = %user.username,
        user_id = %user.user_id,
        "Authentication successful, adding user to request"
    );

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
