//! Session persistence abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use capacity_core::AppResult;
use capacity_entity::session::{CreateSession, UserSession};

/// Result of an admission attempt.
#[derive(Debug, Clone)]
pub enum Admission {
    /// The session was created.
    Admitted(UserSession),
    /// The user already holds the maximum number of active sessions.
    AtCapacity,
}

/// Storage for user sessions.
///
/// `create_within_limit` must count and insert atomically with respect to
/// concurrent logins of the same user. Every other mutation only ever moves a
/// session from active to inactive, or updates an active row in place.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Insert a new active session unless the user already has `max_active`.
    async fn create_within_limit(
        &self,
        data: &CreateSession,
        max_active: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Admission>;

    /// Look a session up by ID, active or not.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserSession>>;

    /// Bump `last_activity` of an active session owned by `user_id`.
    async fn touch(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// Bump `last_activity` of the user's most recently active session.
    async fn touch_latest(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// Deactivate every active session idle since before `cutoff`.
    async fn deactivate_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Deactivate one session of `user_id`.
    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Deactivate the session of `user_id` holding this refresh digest.
    async fn deactivate_by_refresh_hash(&self, hash: &str, user_id: Uuid) -> AppResult<bool>;

    /// Deactivate every session of `user_id`.
    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Count active sessions, for one user or for everyone.
    async fn count_active(&self, user_id: Option<Uuid>) -> AppResult<u64>;

    /// Active sessions, most recently active first.
    async fn list_active(&self, user_id: Option<Uuid>) -> AppResult<Vec<UserSession>>;

    /// Replace the stored refresh digest of an active session.
    async fn update_refresh_hash(&self, id: Uuid, hash: &str) -> AppResult<bool>;
}
