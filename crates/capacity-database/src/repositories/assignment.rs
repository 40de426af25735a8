//! Assignment repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_entity::assignment::{Assignment, AssignmentInput};

use super::db_error;

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    /// Include rows of hidden projects.
    pub include_hidden: bool,
    /// Restrict to one employee.
    pub employee_id: Option<Uuid>,
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Weeks on or after this date.
    pub week_from: Option<NaiveDate>,
    /// Weeks on or before this date.
    pub week_until: Option<NaiveDate>,
}

/// Repository for weekly assignments.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an assignment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find assignment", e))
    }

    /// List assignments ordered by week.
    pub async fn find_all(
        &self,
        filter: &AssignmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Assignment>> {
        const FROM: &str = "FROM assignments a JOIN projects p ON p.id = a.project_id \
             WHERE ($1 OR NOT p.is_hidden) \
             AND ($2::uuid IS NULL OR a.employee_id = $2) \
             AND ($3::uuid IS NULL OR a.project_id = $3) \
             AND ($4::date IS NULL OR a.week_start_date >= $4) \
             AND ($5::date IS NULL OR a.week_start_date <= $5)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM}"))
            .bind(filter.include_hidden)
            .bind(filter.employee_id)
            .bind(filter.project_id)
            .bind(filter.week_from)
            .bind(filter.week_until)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count assignments", e))?;

        let rows = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT a.* {FROM} ORDER BY a.week_start_date, a.employee_id LIMIT $6 OFFSET $7"
        ))
        .bind(filter.include_hidden)
        .bind(filter.employee_id)
        .bind(filter.project_id)
        .bind(filter.week_from)
        .bind(filter.week_until)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list assignments", e))?;

        Ok(PageResponse::new(rows, *page, total as u64))
    }

    /// Create an assignment.
    pub async fn create(&self, data: &AssignmentInput) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments (employee_id, project_id, week_start_date, hours, \
             scio_hours, external_hours, stage, comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.project_id)
        .bind(data.week_start_date)
        .bind(data.hours)
        .bind(data.scio_hours)
        .bind(data.external_hours)
        .bind(data.stage)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create assignment", e))
    }

    /// Replace an assignment.
    pub async fn update(&self, id: Uuid, data: &AssignmentInput) -> AppResult<Option<Assignment>> {
        sqlx::query_as::<_, Assignment>(
            "UPDATE assignments SET employee_id = $2, project_id = $3, week_start_date = $4, \
             hours = $5, scio_hours = $6, external_hours = $7, stage = $8, comment = $9, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.employee_id)
        .bind(data.project_id)
        .bind(data.week_start_date)
        .bind(data.hours)
        .bind(data.scio_hours)
        .bind(data.external_hours)
        .bind(data.stage)
        .bind(&data.comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update assignment", e))
    }

    /// Delete an assignment.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete assignment", e))?;
        Ok(result.rows_affected() > 0)
    }
}
