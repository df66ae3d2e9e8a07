// Public API - what other modules can use
pub use handlers::send_notification;
pub use service::NotificationService;
pub use types::{NotificationRequest, SendNotificationBody};

// Internal modules
mod handlers;
mod service;
mod types;
