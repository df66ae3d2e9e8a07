use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::UserAccount,
    repository::UserRepository,
    token::TokenConfig,
    types::{AuthenticatedUser, SessionResponse, SignInRequest},
};
use crate::shared::AppError;

/// Service for handling sign-in and credential resolution
pub struct SessionService {
    token_config: TokenConfig,
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            token_config,
            repository,
        }
    }

    /// Stores the user's HipChat token and issues a session JWT.
    ///
    /// A new username creates an account. The token of an existing account
    /// is only replaced when `current` is a session of that same account;
    /// any other sign-in for a taken username is a conflict.
    #[instrument(skip(self, request, current), fields(username = %request.username))]
    pub async fn sign_in(
        &self,
        request: SignInRequest,
        current: Option<&AuthenticatedUser>,
    ) -> Result<SessionResponse, AppError> {
        let username = request.username.trim();
        let hipchat_token = request.hipchat_token.trim();
        if username.is_empty() || hipchat_token.is_empty() {
            return Err(AppError::BadRequest(
                "username and hipchat_token are required".to_string(),
            ));
        }

        let user = match self.repository.find_by_username(username).await? {
            Some(mut existing) => {
                if current.map(|session| session.user_id.as_str()) != Some(existing.id.as_str()) {
                    warn!(user_id = %existing.id, "Sign-in for a taken username without its session");
                    return Err(username_taken(username));
                }
                existing.replace_token(hipchat_token.to_string());
                self.repository.update_user(&existing).await?;
                info!(user_id = %existing.id, "Replaced stored HipChat token");
                existing
            }
            None => {
                let user = UserAccount::new(username.to_string(), hipchat_token.to_string());
                match self.repository.create_user(&user).await {
                    Ok(()) => {}
                    // Another sign-in created the same username first
                    Err(AppError::Conflict(_)) => return Err(username_taken(username)),
                    Err(e) => return Err(e),
                }
                info!(user_id = %user.id, "Created user account");
                user
            }
        };

        let token = self
            .token_config
            .create_token(user.id.clone(), user.username.clone())?;

        Ok(SessionResponse {
            token,
            username: user.username,
        })
    }

    /// Validates a session token and resolves the caller's HipChat credential
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.token_config.validate_token(token)?;

        match self.repository.get_user(&claims.user_id).await? {
            Some(user) => {
                info!(
                    username = %user.username,
                    user_id = %user.id,
                    "Session validated against user store"
                );
                Ok(AuthenticatedUser {
                    credential: user.credential(),
                    user_id: user.id,
                    username: user.username,
                })
            }
            None => {
                warn!(user_id = %claims.user_id, "Session refers to an unknown user");
                Err(AppError::IdentityLookup(format!(
                    "No account for user {}",
                    claims.user_id
                )))
            }
        }
    }
}

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("Username {} is already registered", username))
}
