use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewUser, User};
use crate::error::DatabaseError;
use crate::store::UserStore;

/// Process-local store with the same uniqueness rules as the Postgres
/// schema. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes a user. Nothing in the HTTP surface calls this; it exists
    /// for operators and tests.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        let mut users = self.users.write().await;
        let index = users.iter().position(|u| u.id == id)?;
        Some(users.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn conflicts(user: &User, username: &str, email: &str) -> bool {
    user.username.to_lowercase() == username.to_lowercase() || user.email == email
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| conflicts(u, username, email)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| conflicts(u, &new_user.username, &new_user.email))
        {
            return Err(DatabaseError::UniqueViolation(
                "username or email already taken".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}
