//! Session repository implementation.
//!
//! Every mutation is a single-row or predicate-bulk update. Creation runs
//! inside a transaction that locks the owning user row so concurrent logins
//! of the same user are serialized at the cap check.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_entity::session::{CreateSession, UserSession};

use super::db_error;

/// Repository for session persistence.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a session unless the user already holds `max_active` active ones.
    ///
    /// Returns `None` when the cap is reached. The count and insert happen
    /// under a `FOR UPDATE` lock on the user row.
    pub async fn create_within_limit(
        &self,
        data: &CreateSession,
        max_active: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserSession>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin session transaction", e))?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(data.user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to lock user for login", e))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND is_active",
        )
        .bind(data.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to count active sessions", e))?;

        if active >= i64::from(max_active) {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to roll back session transaction", e))?;
            return Ok(None);
        }

        let session = sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions \
             (id, user_id, refresh_token_hash, device_info, created_at, last_activity, is_active) \
             VALUES ($1, $2, $3, $4, $5, $5, TRUE) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.refresh_token_hash)
        .bind(data.device_info.to_json())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create session", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit session", e))?;
        Ok(Some(session))
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserSession>> {
        sqlx::query_as::<_, UserSession>("SELECT * FROM user_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find session", e))
    }

    /// Advance `last_activity` of one active session owned by `user_id`.
    pub async fn touch(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET last_activity = $3 \
             WHERE id = $1 AND user_id = $2 AND is_active",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update session activity", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Advance `last_activity` of the user's most recently active session.
    pub async fn touch_latest(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET last_activity = $2 WHERE id = ( \
                 SELECT id FROM user_sessions WHERE user_id = $1 AND is_active \
                 ORDER BY last_activity DESC LIMIT 1)",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update latest session activity", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag every active session idle since before `cutoff` as inactive.
    pub async fn deactivate_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE \
             WHERE is_active AND last_activity < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to sweep idle sessions", e))?;
        Ok(result.rows_affected())
    }

    /// Deactivate one session owned by `user_id`.
    pub async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE \
             WHERE id = $1 AND user_id = $2 AND is_active",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to deactivate session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate the session of `user_id` holding the given refresh digest.
    pub async fn deactivate_by_refresh_hash(&self, hash: &str, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE \
             WHERE refresh_token_hash = $1 AND user_id = $2 AND is_active",
        )
        .bind(hash)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to deactivate session by refresh token", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate every session of a user.
    pub async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_active = FALSE WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to deactivate user sessions", e))?;
        Ok(result.rows_affected())
    }

    /// Count active sessions of a user.
    pub async fn count_active(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count active sessions", e))
    }

    /// Count active sessions system-wide.
    pub async fn count_all_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count all active sessions", e))
    }

    /// List active sessions, most recently active first. `None` lists every user.
    pub async fn list_active(&self, user_id: Option<Uuid>) -> AppResult<Vec<UserSession>> {
        sqlx::query_as::<_, UserSession>(
            "SELECT * FROM user_sessions \
             WHERE is_active AND ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY last_activity DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list active sessions", e))
    }

    /// Rotate the refresh digest of an active session.
    pub async fn update_refresh_hash(&self, id: Uuid, hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET refresh_token_hash = $2 WHERE id = $1 AND is_active",
        )
        .bind(id)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to rotate refresh token", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capacity_entity::session::DeviceInfo;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        crate::migration::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $1, 'x') RETURNING id",
        )
        .bind(format!("race-{}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_concurrent_logins_never_exceed_cap() {
        let pool = pool().await;
        let user_id = insert_user(&pool).await;
        let repo = SessionRepository::new(pool);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let data = CreateSession {
                    id: Uuid::new_v4(),
                    user_id,
                    refresh_token_hash: Uuid::new_v4().simple().to_string(),
                    device_info: DeviceInfo::default(),
                };
                repo.create_within_limit(&data, 2, Utc::now()).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 2);
        assert_eq!(repo.count_active(user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_sweep_flags_idle_sessions() {
        let pool = pool().await;
        let user_id = insert_user(&pool).await;
        let repo = SessionRepository::new(pool);
        let then = Utc::now() - chrono::Duration::minutes(30);

        let data = CreateSession {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash: Uuid::new_v4().simple().to_string(),
            device_info: DeviceInfo::default(),
        };
        repo.create_within_limit(&data, 2, then).await.unwrap();

        let flipped = repo
            .deactivate_idle(Utc::now() - chrono::Duration::minutes(20))
            .await
            .unwrap();
        assert!(flipped >= 1);
        let session = repo.find_by_id(data.id).await.unwrap().unwrap();
        assert!(!session.is_active);
    }
}
