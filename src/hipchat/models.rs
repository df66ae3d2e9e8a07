use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One page of a HipChat collection response
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
    #[serde(rename = "maxResults")]
    pub max_results: Option<u32>,
    #[serde(rename = "startIndex")]
    pub start_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub links: RoomLinks,
}

impl Room {
    /// Whether the room exposes a member list (private rooms do, public ones don't)
    pub fn has_members_link(&self) -> bool {
        self.links.members.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub mention_name: Option<String>,
}

/// Room events a webhook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WebhookEvent {
    RoomNotification,
    RoomMessage,
}

/// A webhook as listed by the API. `event` stays a plain string because the
/// room may carry hooks for events this service never registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub event: String,
    pub url: String,
}

impl Webhook {
    pub fn matches(&self, name: &str, event: WebhookEvent) -> bool {
        self.name == name && self.event == event.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWebhook {
    pub name: String,
    pub event: WebhookEvent,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedWebhook {
    pub id: i64,
}

/// Sender of a history message: a bare name for notifications sent by
/// integrations, a user object for messages typed by people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageSender {
    PlainName(String),
    Structured(StructuredSender),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSender {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_name: Option<String>,
}

impl MessageSender {
    pub fn display_name(&self) -> &str {
        match self {
            MessageSender::PlainName(name) => name,
            MessageSender::Structured(sender) => &sender.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub color: Option<String>,
    pub from: MessageSender,
    #[serde(default)]
    pub file: Option<FileRef>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Background colors HipChat accepts for notifications
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationColor {
    Yellow,
    Green,
    Red,
    Purple,
    #[default]
    Gray,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendNotification {
    pub message: String,
    pub color: NotificationColor,
    pub notify: bool,
    pub message_format: String,
}
