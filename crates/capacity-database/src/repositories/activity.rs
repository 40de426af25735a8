//! Activity log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_entity::activity::{ActivityLog, CreateActivityLog};

use super::db_error;

/// Repository for the activity trail. Entries are append-only.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry.
    pub async fn create(&self, data: &CreateActivityLog) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs (user_id, action, model_name, object_id, changes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.action)
        .bind(&data.model_name)
        .bind(&data.object_id)
        .bind(&data.changes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create activity log", e))
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>("SELECT * FROM activity_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find activity log", e))
    }

    /// List entries newest first, optionally filtered by user and model.
    pub async fn find_all(
        &self,
        user_id: Option<Uuid>,
        model_name: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        const WHERE: &str = "WHERE ($1::uuid IS NULL OR user_id = $1) \
             AND ($2::text IS NULL OR model_name = $2)";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM activity_logs {WHERE}"))
                .bind(user_id)
                .bind(model_name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count activity logs", e))?;

        let entries = sqlx::query_as::<_, ActivityLog>(&format!(
            "SELECT * FROM activity_logs {WHERE} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(model_name)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list activity logs", e))?;

        Ok(PageResponse::new(entries, *page, total as u64))
    }
}
