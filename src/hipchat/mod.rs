// Public API - what other modules can use
pub use client::{ChatApi, ChatClientFactory, Credential, HipChatClient, HipChatClientFactory};
pub use error::ChatApiError;

// Internal modules
mod client;
mod error;
pub mod models;
