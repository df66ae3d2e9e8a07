// Public API - what other modules can use
pub use handlers::view_chat;
pub use models::{ChatView, MessageRecord};
pub use service::ChatService;
pub use webhooks::{CallbackUrls, RoomLocks, WebhookRegistrar, SENTINEL_WEBHOOK_NAME};

// Internal modules
mod handlers;
pub mod models;
mod service;
pub mod webhooks;
