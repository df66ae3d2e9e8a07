use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::ChatView,
    service::ChatService,
    webhooks::{CallbackUrls, WebhookRegistrar},
};
use crate::{
    session::AuthenticatedUser,
    shared::{AppError, AppState},
};

/// HTTP handler for a room's chat page
///
/// GET /rooms/:room_id/chat
/// Registers this service's webhooks on the room if missing, then returns its history
#[instrument(name = "view_chat", skip(state, user), fields(user_id = %user.user_id))]
pub async fn view_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> Result<Json<ChatView>, AppError> {
    info!(room_id = %room_id, "Loading chat");

    let api = state.chat_clients.client_for(&user.credential);
    let registrar = WebhookRegistrar::new(
        api.clone(),
        state.webhook_locks.clone(),
        CallbackUrls::new(state.config.base_uri.clone()),
    );
    let view = ChatService::new(api, registrar).assemble(&room_id).await?;

    Ok(Json(view))
}
