// Public API - what other modules can use
pub use handlers::sign_in;
pub use middleware::jwt_auth;
pub use service::SessionService;
pub use token::TokenConfig;
pub use types::{AuthenticatedUser, SessionClaims, SessionResponse, SignInRequest};

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
mod service;
mod token;
mod types;
