use std::sync::Arc;
use tracing::{info, instrument};

use super::types::NotificationRequest;
use crate::{
    hipchat::{models::SendNotification, ChatApi},
    shared::AppError,
};

/// Sends room notifications on behalf of the signed-in user
pub struct NotificationService {
    api: Arc<dyn ChatApi>,
}

impl NotificationService {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Decodes HTML entities in the text and posts it to the room
    #[instrument(skip(self, request), fields(room_id = %request.room_id, color = %request.color))]
    pub async fn send(&self, request: NotificationRequest) -> Result<bool, AppError> {
        let message = html_escape::decode_html_entities(&request.message).into_owned();

        let notification = SendNotification {
            message,
            color: request.color,
            notify: false,
            message_format: "text".to_string(),
        };
        self.api
            .send_room_notification(&request.room_id, &notification)
            .await?;

        info!("Notification sent");
        Ok(true)
    }
}
