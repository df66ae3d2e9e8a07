// Public API - what other modules can use
pub use handlers::list_rooms;
pub use service::RoomService;
pub use types::RoomSummary;

// Internal modules
mod handlers;
mod service;
mod types;
