//! PostgreSQL-backed session store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use capacity_core::AppResult;
use capacity_database::repositories::SessionRepository;
use capacity_entity::session::{CreateSession, UserSession};

use super::store::{Admission, SessionStore};

/// Session store over [`SessionRepository`]. Admission uses a row lock on the user.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    repo: Arc<SessionRepository>,
}

impl PgSessionStore {
    /// Wrap a repository.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_within_limit(
        &self,
        data: &CreateSession,
        max_active: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Admission> {
        Ok(match self.repo.create_within_limit(data, max_active, now).await? {
            Some(session) => Admission::Admitted(session),
            None => Admission::AtCapacity,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserSession>> {
        self.repo.find_by_id(id).await
    }

    async fn touch(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        self.repo.touch(id, user_id, now).await
    }

    async fn touch_latest(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        self.repo.touch_latest(user_id, now).await
    }

    async fn deactivate_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.repo.deactivate_idle(cutoff).await
    }

    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.repo.deactivate(id, user_id).await
    }

    async fn deactivate_by_refresh_hash(&self, hash: &str, user_id: Uuid) -> AppResult<bool> {
        self.repo.deactivate_by_refresh_hash(hash, user_id).await
    }

    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        self.repo.deactivate_all(user_id).await
    }

    async fn count_active(&self, user_id: Option<Uuid>) -> AppResult<u64> {
        let count = match user_id {
            Some(user_id) => self.repo.count_active(user_id).await?,
            None => self.repo.count_all_active().await?,
        };
        Ok(count.max(0) as u64)
    }

    async fn list_active(&self, user_id: Option<Uuid>) -> AppResult<Vec<UserSession>> {
        self.repo.list_active(user_id).await
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: &str) -> AppResult<bool> {
        self.repo.update_refresh_hash(id, hash).await
    }
}
