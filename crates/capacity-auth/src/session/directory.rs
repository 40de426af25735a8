//! Lookup and update of user accounts for authentication.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use capacity_core::AppResult;
use capacity_database::repositories::UserRepository;
use capacity_entity::user::User;

/// The credential store consulted by login, refresh and password changes.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    /// Case-insensitive username lookup.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Lookup by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Record a successful login.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Replace a user's password hash.
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;
}

/// Directory backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    repo: Arc<UserRepository>,
}

impl PgUserDirectory {
    /// Wrap a repository.
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.repo.record_login(id, at).await
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        self.repo.update_password_hash(id, password_hash).await
    }
}

/// In-memory directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let wanted = username.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username.to_lowercase() == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        Ok(match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                true
            }
            None => false,
        })
    }
}
