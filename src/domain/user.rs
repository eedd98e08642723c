use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{generate_access_token, generate_refresh_token, verify_password};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// A stored user, password hash included. Never serialized directly;
/// use [`User::omit_password`] for anything that leaves the process.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input to `UserStore::create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// The user record as clients see it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn compare_password(&self, candidate: &str) -> Result<bool, AppError> {
        verify_password(candidate.to_string(), self.password_hash.clone()).await
    }

    pub fn access_token(&self, config: &JwtSettings) -> Result<String, AppError> {
        generate_access_token(&self.id, &self.username, config)
    }

    pub fn refresh_token(&self, config: &JwtSettings) -> Result<String, AppError> {
        generate_refresh_token(&self.id, &self.username, config)
    }

    pub fn omit_password(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}
