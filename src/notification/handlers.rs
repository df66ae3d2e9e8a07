use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    service::NotificationService,
    types::{NotificationRequest, SendNotificationBody},
};
use crate::{
    session::AuthenticatedUser,
    shared::{AppError, AppState},
};

/// HTTP handler for posting a notification
///
/// POST /rooms/:room_id/notification
/// Returns `true` once HipChat accepted the notification
#[instrument(name = "send_notification", skip(state, user, body), fields(user_id = %user.user_id))]
pub async fn send_notification(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
    Json(body): Json<SendNotificationBody>,
) -> Result<Json<bool>, AppError> {
    info!(room_id = %room_id, "Sending notification");

    let api = state.chat_clients.client_for(&user.credential);
    let sent = NotificationService::new(api)
        .send(NotificationRequest::new(room_id, body.message, body.color))
        .await?;

    Ok(Json(sent))
}
