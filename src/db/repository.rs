use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{ProfileUpdate, User};
use crate::Result;

/// Persistence capability for accounts.
///
/// Handlers and services receive it as `Arc<dyn UserRepository>` so a test double or the
/// in-memory store can stand in for Postgres. Email uniqueness is enforced by the store
/// itself: `insert_user` and `update_profile` fail with `DatabaseError::Duplicate` when
/// another account already holds the address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Accounts in creation order.
    async fn list_users(&self, offset: i64, limit: i64) -> Result<Vec<User>>;

    async fn count_users(&self) -> Result<i64>;

    /// Returns `false` when no account has the given id.
    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Returns `false` when no account has the given id.
    async fn update_tokens(
        &self,
        id: Uuid,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;
}
