use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::hipchat::Credential;

/// Account record holding the user's stored HipChat token
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String, // UUID v4 as string
    pub username: String,
    #[serde(skip_serializing)]
    pub hipchat_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(username: String, hipchat_token: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            username,
            hipchat_token,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn replace_token(&mut self, hipchat_token: String) {
        self.hipchat_token = hipchat_token;
        self.updated_at = Utc::now();
    }

    pub fn credential(&self) -> Credential {
        Credential::new(self.hipchat_token.clone())
    }
}
