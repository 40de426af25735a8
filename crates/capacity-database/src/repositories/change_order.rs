//! Change order repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_entity::department::Department;
use capacity_entity::project::{ChangeOrderInput, ProjectChangeOrder};

use super::db_error;

/// Repository for project change orders.
#[derive(Debug, Clone)]
pub struct ChangeOrderRepository {
    pool: PgPool,
}

impl ChangeOrderRepository {
    /// Create a new change order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a change order by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProjectChangeOrder>> {
        sqlx::query_as::<_, ProjectChangeOrder>(
            "SELECT * FROM project_change_orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find change order", e))
    }

    /// Change orders filtered by project and/or department.
    pub async fn find_filtered(
        &self,
        project_id: Option<Uuid>,
        department: Option<Department>,
    ) -> AppResult<Vec<ProjectChangeOrder>> {
        sqlx::query_as::<_, ProjectChangeOrder>(
            "SELECT * FROM project_change_orders \
             WHERE ($1::uuid IS NULL OR project_id = $1) \
             AND ($2::department IS NULL OR department = $2) \
             ORDER BY project_id, department, name",
        )
        .bind(project_id)
        .bind(department)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list change orders", e))
    }

    /// Create a change order.
    pub async fn create(&self, data: &ChangeOrderInput) -> AppResult<ProjectChangeOrder> {
        sqlx::query_as::<_, ProjectChangeOrder>(
            "INSERT INTO project_change_orders (project_id, department, name, hours_quoted) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.project_id)
        .bind(data.department)
        .bind(&data.name)
        .bind(data.hours_quoted)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create change order", e))
    }

    /// Replace a change order.
    pub async fn update(
        &self,
        id: Uuid,
        data: &ChangeOrderInput,
    ) -> AppResult<Option<ProjectChangeOrder>> {
        sqlx::query_as::<_, ProjectChangeOrder>(
            "UPDATE project_change_orders SET project_id = $2, department = $3, name = $4, \
             hours_quoted = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.project_id)
        .bind(data.department)
        .bind(&data.name)
        .bind(data.hours_quoted)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update change order", e))
    }

    /// Delete a change order.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM project_change_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete change order", e))?;
        Ok(result.rows_affected() > 0)
    }
}
