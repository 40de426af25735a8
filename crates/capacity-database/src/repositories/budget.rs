//! Project budget repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_entity::department::Department;
use capacity_entity::project::{BudgetHoursPatch, ProjectBudget};

use super::db_error;

/// Repository for project budgets.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    /// Create a new budget repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a budget by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProjectBudget>> {
        sqlx::query_as::<_, ProjectBudget>("SELECT * FROM project_budgets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find budget", e))
    }

    /// Budgets of one project, or of every project.
    pub async fn find_by_project(&self, project_id: Option<Uuid>) -> AppResult<Vec<ProjectBudget>> {
        sqlx::query_as::<_, ProjectBudget>(
            "SELECT * FROM project_budgets WHERE ($1::uuid IS NULL OR project_id = $1) \
             ORDER BY project_id, department",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list budgets", e))
    }

    /// Create a budget row.
    pub async fn create(
        &self,
        project_id: Uuid,
        department: Department,
        hours: &BudgetHoursPatch,
    ) -> AppResult<ProjectBudget> {
        sqlx::query_as::<_, ProjectBudget>(
            "INSERT INTO project_budgets (project_id, department, hours_allocated, \
             hours_utilized, hours_forecast) \
             VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, 0), COALESCE($5, 0)) RETURNING *",
        )
        .bind(project_id)
        .bind(department)
        .bind(hours.hours_allocated)
        .bind(hours.hours_utilized)
        .bind(hours.hours_forecast)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create budget", e))
    }

    /// Apply a partial hours update to the budget of a project department.
    pub async fn patch_hours(
        &self,
        project_id: Uuid,
        department: Department,
        hours: &BudgetHoursPatch,
    ) -> AppResult<Option<ProjectBudget>> {
        sqlx::query_as::<_, ProjectBudget>(
            "UPDATE project_budgets SET \
             hours_allocated = COALESCE($3, hours_allocated), \
             hours_utilized = COALESCE($4, hours_utilized), \
             hours_forecast = COALESCE($5, hours_forecast), \
             updated_at = NOW() \
             WHERE project_id = $1 AND department = $2 RETURNING *",
        )
        .bind(project_id)
        .bind(department)
        .bind(hours.hours_allocated)
        .bind(hours.hours_utilized)
        .bind(hours.hours_forecast)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update budget hours", e))
    }

    /// Apply a partial hours update by budget ID.
    pub async fn patch_by_id(
        &self,
        id: Uuid,
        hours: &BudgetHoursPatch,
    ) -> AppResult<Option<ProjectBudget>> {
        sqlx::query_as::<_, ProjectBudget>(
            "UPDATE project_budgets SET \
             hours_allocated = COALESCE($2, hours_allocated), \
             hours_utilized = COALESCE($3, hours_utilized), \
             hours_forecast = COALESCE($4, hours_forecast), \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(hours.hours_allocated)
        .bind(hours.hours_utilized)
        .bind(hours.hours_forecast)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update budget", e))
    }

    /// Delete a budget row.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM project_budgets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete budget", e))?;
        Ok(result.rows_affected() > 0)
    }
}
