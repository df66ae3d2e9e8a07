use serde::{Deserialize, Serialize};

use crate::hipchat::models::HistoryMessage;

/// A history message reshaped for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub message: String,
    pub color: Option<String>,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl From<&HistoryMessage> for MessageRecord {
    fn from(message: &HistoryMessage) -> Self {
        Self {
            id: message.id.clone(),
            message: message.message.clone(),
            color: message.color.clone(),
            from: message.from.display_name().to_string(),
            file_url: message.file.as_ref().map(|file| file.url.clone()),
        }
    }
}

/// Response for the chat page of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatView {
    pub room_id: String,
    pub messages: Vec<MessageRecord>,
}
