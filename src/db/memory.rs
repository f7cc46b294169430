use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    models::{NewUser, User},
    users::{DuplicateField, StoreError, UserStore},
};

/// `UserStore` kept in memory, enforcing the same unique keys as the
/// `users` table.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user, simulating an account deleted out of band.
    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.username == username)
            .or_else(|| users.iter().find(|u| u.email == email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate(DuplicateField::Username));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate(DuplicateField::Email));
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
