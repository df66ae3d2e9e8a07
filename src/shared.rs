use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::chat::RoomLocks;
use crate::config::AppConfig;
use crate::hipchat::{ChatApiError, ChatClientFactory};
use crate::session::SessionService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session_service: Arc<SessionService>,
    pub chat_clients: Arc<dyn ChatClientFactory>,
    pub webhook_locks: RoomLocks,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        session_service: Arc<SessionService>,
        chat_clients: Arc<dyn ChatClientFactory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session_service,
            chat_clients,
            webhook_locks: RoomLocks::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HipChat request failed: {0}")]
    Upstream(ChatApiError),

    #[error("Identity lookup failed: {0}")]
    IdentityLookup(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<ChatApiError> for AppError {
    fn from(error: ChatApiError) -> Self {
        match error {
            // Rejected before any request leaves the service
            ChatApiError::InvalidRoomId(_) => AppError::BadRequest(error.to_string()),
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                format!("HipChat request failed: {}", e),
            ),
            AppError::IdentityLookup(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::JwtError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
