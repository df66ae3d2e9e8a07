use axum::{extract::State, Extension, Json};
use tracing::{info, instrument};

use super::{service::RoomService, types::RoomSummary};
use crate::{
    session::AuthenticatedUser,
    shared::{AppError, AppState},
};

/// HTTP handler for listing rooms
///
/// GET /rooms
/// Returns every room the caller's HipChat token can see, with member counts
#[instrument(name = "list_rooms", skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<RoomSummary>>, AppError> {
    info!("Listing rooms");

    let api = state.chat_clients.client_for(&user.credential);
    let rooms = RoomService::new(api).list_rooms().await?;

    info!(room_count = rooms.len(), "Rooms listed successfully");

    Ok(Json(rooms))
}
