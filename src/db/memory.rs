use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{ProfileUpdate, User};
use crate::db::repository::UserRepository;
use crate::error::DatabaseError;
use crate::Result;

/// In-process account store, kept in insertion order.
///
/// Useful for tests and local runs without Postgres. Applies the same unique-email rule as
/// the `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.users.read().await.iter().any(|u| u.email == email))
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email || u.id == user.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        users.push(user.clone());
        debug!("Stored user {} ({} total)", user.id, users.len());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        if let Some(email) = &update.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(DatabaseError::Duplicate.into());
            }
        }
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                update.apply_to(user, updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_tokens(
        &self,
        id: Uuid,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.token = Some(token.to_string());
                user.refresh_token = Some(refresh_token.to_string());
                user.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ExperienceLevel, UserType};
    use crate::error::AppError;
    use chrono::NaiveDate;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 12, 9).unwrap(),
            email: email.into(),
            password_hash: "hash".into(),
            user_type: UserType::Professional,
            experience_level: ExperienceLevel::MidLevel,
            college: None,
            current_company: None,
            resume_urls: vec![],
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.insert_user(&user("grace@example.com")).await.unwrap();

        let err = store.insert_user(&user("grace@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(DatabaseError::Duplicate)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryUserStore::new();
        for i in 0..12 {
            store.insert_user(&user(&format!("user{}@example.com", i))).await.unwrap();
        }

        let page = store.list_users(5, 5).await.unwrap();
        let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "user5@example.com",
                "user6@example.com",
                "user7@example.com",
                "user8@example.com",
                "user9@example.com",
            ]
        );
        assert_eq!(store.count_users().await.unwrap(), 12);
        assert!(store.list_users(20, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let store = MemoryUserStore::new();
        let first = user("first@example.com");
        let second = user("second@example.com");
        store.insert_user(&first).await.unwrap();
        store.insert_user(&second).await.unwrap();

        let update = ProfileUpdate {
            email: Some("first@example.com".into()),
            ..Default::default()
        };
        let err = store.update_profile(second.id, &update, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(DatabaseError::Duplicate)));

        // Re-saving an account's own address is not a conflict.
        let update = ProfileUpdate {
            email: Some("second@example.com".into()),
            ..Default::default()
        };
        assert!(store.update_profile(second.id, &update, Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_tokens_unknown_id() {
        let store = MemoryUserStore::new();
        let applied = store
            .update_tokens(Uuid::new_v4(), "a", "r", Utc::now())
            .await
            .unwrap();
        assert!(!applied);
    }
}
