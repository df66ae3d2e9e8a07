use serde::{Deserialize, Serialize};

use crate::hipchat::Credential;

/// JWT claims structure containing session information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub user_id: String,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request body for signing in with a HipChat personal token
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub hipchat_token: String,
}

/// Response structure for session creation endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub token: String, // The JWT
    pub username: String,
}

/// Identity of the caller, resolved by the auth middleware and read by
/// handlers through `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub credential: Credential,
}
