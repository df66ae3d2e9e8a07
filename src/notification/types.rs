use serde::Deserialize;

use crate::hipchat::models::NotificationColor;

/// Request body for posting a notification to a room
#[derive(Debug, Deserialize)]
pub struct SendNotificationBody {
    pub message: String,
    #[serde(default)]
    pub color: Option<NotificationColor>,
}

/// A notification ready to send; `message` may still contain HTML entities
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub room_id: String,
    pub message: String,
    pub color: NotificationColor,
}

impl NotificationRequest {
    pub fn new(
        room_id: impl Into<String>,
        message: impl Into<String>,
        color: Option<NotificationColor>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            message: message.into(),
            color: color.unwrap_or_default(),
        }
    }
}
