//! Stage configuration repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_entity::department::Department;
use capacity_entity::project::{DepartmentStageConfig, NewStageConfig};

use super::db_error;

/// Repository for per-department stage rows.
#[derive(Debug, Clone)]
pub struct StageConfigRepository {
    pool: PgPool,
}

impl StageConfigRepository {
    /// Create a new stage config repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a stage row by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DepartmentStageConfig>> {
        sqlx::query_as::<_, DepartmentStageConfig>(
            "SELECT * FROM department_stage_configs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find stage config", e))
    }

    /// Every stage row of a project.
    pub async fn find_by_project(&self, project_id: Uuid) -> AppResult<Vec<DepartmentStageConfig>> {
        self.find_filtered(Some(project_id), None).await
    }

    /// Stage rows filtered by project and/or department.
    pub async fn find_filtered(
        &self,
        project_id: Option<Uuid>,
        department: Option<Department>,
    ) -> AppResult<Vec<DepartmentStageConfig>> {
        sqlx::query_as::<_, DepartmentStageConfig>(
            "SELECT * FROM department_stage_configs \
             WHERE ($1::uuid IS NULL OR project_id = $1) \
             AND ($2::department IS NULL OR department = $2) \
             ORDER BY project_id, department, week_start",
        )
        .bind(project_id)
        .bind(department)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list stage configs", e))
    }

    /// Insert one stage row.
    pub async fn create(
        &self,
        project_id: Uuid,
        data: &NewStageConfig,
    ) -> AppResult<DepartmentStageConfig> {
        sqlx::query_as::<_, DepartmentStageConfig>(
            "INSERT INTO department_stage_configs (project_id, department, stage, week_start, \
             week_end, department_start_date, duration_weeks) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(project_id)
        .bind(data.department)
        .bind(data.stage)
        .bind(data.week_start)
        .bind(data.week_end)
        .bind(data.department_start_date)
        .bind(data.duration_weeks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create stage config", e))
    }

    /// Replace one stage row.
    pub async fn update(
        &self,
        id: Uuid,
        data: &NewStageConfig,
    ) -> AppResult<Option<DepartmentStageConfig>> {
        sqlx::query_as::<_, DepartmentStageConfig>(
            "UPDATE department_stage_configs SET department = $2, stage = $3, week_start = $4, \
             week_end = $5, department_start_date = $6, duration_weeks = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.department)
        .bind(data.stage)
        .bind(data.week_start)
        .bind(data.week_end)
        .bind(data.department_start_date)
        .bind(data.duration_weeks)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update stage config", e))
    }

    /// Delete one stage row.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM department_stage_configs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete stage config", e))?;
        Ok(result.rows_affected() > 0)
    }
}
