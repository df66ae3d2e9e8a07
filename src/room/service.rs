use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::RoomSummary;
use crate::{
    hipchat::{models::Room, ChatApi},
    shared::AppError,
};

/// Service for listing the rooms visible to a credential
pub struct RoomService {
    api: Arc<dyn ChatApi>,
}

impl RoomService {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Lists rooms in upstream order with their member counts.
    ///
    /// Member lists are fetched concurrently; the first failure fails the whole listing.
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, AppError> {
        let rooms = self.api.list_rooms().await?;
        info!(room_count = rooms.len(), "Rooms retrieved from HipChat");

        let summaries = try_join_all(rooms.iter().map(|room| self.summarize(room))).await?;

        Ok(summaries)
    }

    async fn summarize(&self, room: &Room) -> Result<RoomSummary, AppError> {
        let member_count = if room.has_members_link() {
            let members = self.api.list_room_members(&room.id.to_string()).await?;
            members.len()
        } else {
            0
        };

        debug!(room_id = room.id, member_count, "Summarized room");

        Ok(RoomSummary {
            id: room.id,
            name: room.name.clone(),
            member_count,
        })
    }
}
