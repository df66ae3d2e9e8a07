use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{ChatView, MessageRecord},
    webhooks::WebhookRegistrar,
};
use crate::{hipchat::ChatApi, shared::AppError};

/// Assembles the chat page for a room
pub struct ChatService {
    api: Arc<dyn ChatApi>,
    registrar: WebhookRegistrar,
}

impl ChatService {
    pub fn new(api: Arc<dyn ChatApi>, registrar: WebhookRegistrar) -> Self {
        Self { api, registrar }
    }

    /// Registers the room's default webhooks if missing, then loads its history.
    /// Messages keep the order the upstream returned them in.
    #[instrument(skip(self))]
    pub async fn assemble(&self, room_id: &str) -> Result<ChatView, AppError> {
        let created = self.registrar.ensure_default_webhooks(room_id).await?;
        if !created.is_empty() {
            info!(room_id = %room_id, created = ?created, "Registered missing webhooks");
        }

        let history = self.api.room_history(room_id).await?;
        let messages: Vec<MessageRecord> = history.iter().map(MessageRecord::from).collect();

        info!(
            room_id = %room_id,
            message_count = messages.len(),
            "Chat view assembled"
        );

        Ok(ChatView {
            room_id: room_id.to_string(),
            messages,
        })
    }
}
