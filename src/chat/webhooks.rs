use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use crate::hipchat::{
    models::{CreateWebhook, WebhookEvent},
    ChatApi, ChatApiError,
};

/// Name given to every webhook this service registers, used to recognise
/// them among other hooks on the room
pub const SENTINEL_WEBHOOK_NAME: &str = "HipChatDotNet_Default";

/// Events registered on every room a user opens
pub const DEFAULT_WEBHOOK_EVENTS: [WebhookEvent; 2] =
    [WebhookEvent::RoomNotification, WebhookEvent::RoomMessage];

/// Per-room async locks serializing webhook registration within this process.
///
/// Entries are never removed; the map is bounded by the number of rooms users open.
#[derive(Clone, Default)]
pub struct RoomLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, room_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(room_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Callback endpoints on this service the upstream delivers webhook events to
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    base_uri: String,
}

impl CallbackUrls {
    /// `base_uri` must end in `/`
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    /// The room id is percent-encoded so it arrives back as one path segment
    pub fn for_event(&self, event: WebhookEvent, room_id: &str) -> String {
        let segment = match event {
            WebhookEvent::RoomNotification => "notification",
            WebhookEvent::RoomMessage => "message",
        };
        format!(
            "{}api/{}/{}",
            self.base_uri,
            segment,
            urlencoding::encode(room_id)
        )
    }
}

/// Makes sure a room carries this service's notification and message webhooks
pub struct WebhookRegistrar {
    api: Arc<dyn ChatApi>,
    locks: RoomLocks,
    callbacks: CallbackUrls,
}

impl WebhookRegistrar {
    pub fn new(api: Arc<dyn ChatApi>, locks: RoomLocks, callbacks: CallbackUrls) -> Self {
        Self {
            api,
            locks,
            callbacks,
        }
    }

    /// Creates whichever default webhooks the room is missing and returns the
    /// events that were registered by this call.
    ///
    /// A failure part way leaves earlier registrations in place; the next call
    /// only creates what is still missing.
    #[instrument(skip(self))]
    pub async fn ensure_default_webhooks(
        &self,
        room_id: &str,
    ) -> Result<Vec<WebhookEvent>, ChatApiError> {
        let _guard = self.locks.acquire(room_id).await;

        let existing = self.api.list_room_webhooks(room_id).await?;
        debug!(existing = existing.len(), "Fetched room webhooks");

        let mut created = Vec::new();
        for event in DEFAULT_WEBHOOK_EVENTS {
            if existing
                .iter()
                .any(|hook| hook.matches(SENTINEL_WEBHOOK_NAME, event))
            {
                continue;
            }

            let request = CreateWebhook {
                name: SENTINEL_WEBHOOK_NAME.to_string(),
                event,
                url: self.callbacks.for_event(event, room_id),
            };
            let hook = self.api.create_room_webhook(room_id, &request).await?;
            info!(room_id = %room_id, %event, webhook_id = hook.id, "Registered webhook");
            created.push(event);
        }

        Ok(created)
    }
}
