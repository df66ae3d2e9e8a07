// Library crate for the HipChat web front-end
// This file exposes the public API for the binary and integration tests

pub mod callback;
pub mod chat;
pub mod config;
pub mod hipchat;
pub mod notification;
pub mod room;
pub mod session;
pub mod shared;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use shared::{AppError, AppState};

/// Builds the application router. Room routes require a session token.
pub fn build_router(app_state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/rooms", get(room::list_rooms))
        .route("/rooms/:room_id/chat", get(chat::view_chat))
        .route(
            "/rooms/:room_id/notification",
            post(notification::send_notification),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/session", post(session::sign_in))
        .route(
            "/api/notification/:room_id",
            post(callback::receive_notification),
        )
        .route("/api/message/:room_id", post(callback::receive_message))
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
