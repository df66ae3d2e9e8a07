use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserAccount;
use crate::shared::AppError;

/// Trait for user account lookups
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &UserAccount) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError>;
    async fn update_user(&self, user: &UserAccount) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// Accounts are lost when the application restarts.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserAccount>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated accounts
    pub fn with_users(users: Vec<UserAccount>) -> Self {
        let user_map = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        Self {
            users: Mutex::new(user_map),
        }
    }

    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserAccount>> {
        // A poisoned map is still consistent: every write is a single insert.
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserAccount) -> Result<(), AppError> {
        debug!(user_id = %user.id, username = %user.username, "Creating user in memory");

        let mut users = self.lock();
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::DatabaseError("User already exists".to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            warn!(username = %user.username, "Username already taken in memory");
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>, AppError> {
        debug!(user_id = %user_id, "Fetching user from memory");
        Ok(self.lock().get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        debug!(username = %username, "Looking up user by username in memory");
        Ok(self
            .lock()
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserAccount) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Updating user in memory");

        let mut users = self.lock();
        if !users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User not found for update in memory");
            return Err(AppError::NotFound("User not found".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        Ok(())
    }
}

/// PostgreSQL adapter over the account store.
///
/// Expects a table
/// `users (id TEXT PRIMARY KEY, username TEXT UNIQUE NOT NULL, hipchat_token TEXT NOT NULL,
/// created_at TIMESTAMPTZ NOT NULL, updated_at TIMESTAMPTZ NOT NULL)`.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> UserAccount {
        UserAccount {
            id: row.get("id"),
            username: row.get("username"),
            hipchat_token: row.get("hipchat_token"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserAccount) -> Result<(), AppError> {
        debug!(user_id = %user.id, username = %user.username, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, username, hipchat_token, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.hipchat_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                warn!(username = %user.username, "Username already taken in database");
                AppError::Conflict("Username already taken".to_string())
            }
            e => {
                warn!(error = %e, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>, AppError> {
        debug!(user_id = %user_id, "Fetching user from database");

        let row = sqlx::query(
            "SELECT id, username, hipchat_token, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        debug!(username = %username, "Looking up user by username in database");

        let row = sqlx::query(
            "SELECT id, username, hipchat_token, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to look up user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserAccount) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Updating user in database");

        let result =
            sqlx::query("UPDATE users SET hipchat_token = $2, updated_at = $3 WHERE id = $1")
                .bind(&user.id)
                .bind(&user.hipchat_token)
                .bind(user.updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, user_id = %user.id, "Failed to update user in database");
                    AppError::DatabaseError(e.to_string())
                })?;

        if result.rows_affected() == 0 {
            warn!(user_id = %user.id, "User not found for update");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
