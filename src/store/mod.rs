/// User record storage
///
/// Handlers only see `dyn UserStore`; the server is wired with either the
/// Postgres store or the in-memory one.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewUser, User};
use crate::error::DatabaseError;

pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Username matches case-insensitively, email exactly.
    ///
    /// Case folding is backend specific: the in-memory store uses Unicode
    /// `to_lowercase`, Postgres uses `lower()` under the database
    /// collation. Non-ASCII usernames may compare differently.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Fails with `DatabaseError::UniqueViolation` when the username
    /// (case-insensitive) or email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError>;
}
