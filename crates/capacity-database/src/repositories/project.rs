//! Project repository implementation.
//!
//! Project writes persist the shared fields and the per-department children
//! (stage rows, budgets) in one transaction. Updates lock the project row and
//! decide what to write from the state read under that lock.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_entity::department::Department;
use capacity_entity::project::{
    DepartmentStageConfig, Facility, Project, ProjectBudget, ProjectChildren, ProjectFields,
};

use super::db_error;

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Include soft-deleted projects.
    pub include_hidden: bool,
    /// Restrict to one facility.
    pub facility: Option<Facility>,
    /// Projects starting on or after this date.
    pub start_from: Option<NaiveDate>,
    /// Projects ending on or before this date.
    pub end_until: Option<NaiveDate>,
    /// Case-insensitive substring of name or client.
    pub search: Option<String>,
}

/// A project and its children, read under the project row lock.
#[derive(Debug, Clone)]
pub struct LockedProject {
    /// The project row.
    pub project: Project,
    /// Every stage row of the project.
    pub stages: Vec<DepartmentStageConfig>,
    /// Every budget row of the project.
    pub budgets: Vec<ProjectBudget>,
}

/// Everything a composite update persists.
#[derive(Debug, Clone)]
pub struct ProjectWrite {
    /// Shared fields after merging the body over the stored row.
    pub fields: ProjectFields,
    /// Departments the project is visible in.
    pub visible_in_departments: Vec<Department>,
    /// Stage replacement and budget upserts.
    pub children: ProjectChildren,
}

/// Repository for projects and their composite writes.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a project by ID, hidden or not.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find project", e))
    }

    /// List projects, newest first.
    pub async fn find_all(
        &self,
        filter: &ProjectFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        const WHERE: &str = "WHERE ($1 OR NOT is_hidden) \
             AND ($2::facility IS NULL OR facility = $2) \
             AND ($3::date IS NULL OR start_date >= $3) \
             AND ($4::date IS NULL OR end_date <= $4) \
             AND ($5::text IS NULL OR name ILIKE '%' || $5 || '%' OR client ILIKE '%' || $5 || '%')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM projects {WHERE}"))
            .bind(filter.include_hidden)
            .bind(filter.facility)
            .bind(filter.start_from)
            .bind(filter.end_until)
            .bind(&filter.search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count projects", e))?;

        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT * FROM projects {WHERE} ORDER BY created_at DESC LIMIT $6 OFFSET $7"
        ))
        .bind(filter.include_hidden)
        .bind(filter.facility)
        .bind(filter.start_from)
        .bind(filter.end_until)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list projects", e))?;

        Ok(PageResponse::new(projects, *page, total as u64))
    }

    /// Insert a project together with its children.
    pub async fn create(
        &self,
        fields: &ProjectFields,
        visible_in_departments: &[Department],
        children: &ProjectChildren,
    ) -> AppResult<Project> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin project transaction", e))?;

        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, client, start_date, end_date, facility, number_of_weeks, \
             project_manager_id, visible_in_departments, is_high_probability) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&fields.name)
        .bind(&fields.client)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.facility)
        .bind(fields.number_of_weeks)
        .bind(fields.project_manager_id)
        .bind(Json(visible_in_departments.to_vec()))
        .bind(fields.is_high_probability)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create project", e))?;

        write_children(&mut *tx, project.id, children).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit project", e))?;
        Ok(project)
    }

    /// Update a project and its children. Returns `None` if the project is gone.
    ///
    /// The project row is locked with `FOR UPDATE` before its children are
    /// read, and `decide` sees that locked state. Concurrent updates of the
    /// same project therefore run one after the other, each deciding on what
    /// the previous one committed. An error from `decide` rolls back.
    pub async fn update_with<F>(&self, id: Uuid, decide: F) -> AppResult<Option<Project>>
    where
        F: FnOnce(&LockedProject) -> AppResult<ProjectWrite>,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin project transaction", e))?;

        let Some(locked) = lock_project(&mut *tx, id).await? else {
            return Ok(None);
        };
        let write = decide(&locked)?;

        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects SET name = $2, client = $3, start_date = $4, end_date = $5, \
             facility = $6, number_of_weeks = $7, project_manager_id = $8, \
             visible_in_departments = $9, is_high_probability = $10, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&write.fields.name)
        .bind(&write.fields.client)
        .bind(write.fields.start_date)
        .bind(write.fields.end_date)
        .bind(write.fields.facility)
        .bind(write.fields.number_of_weeks)
        .bind(write.fields.project_manager_id)
        .bind(Json(write.visible_in_departments.clone()))
        .bind(write.fields.is_high_probability)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update project", e))?;

        write_children(&mut *tx, project.id, &write.children).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit project", e))?;
        Ok(Some(project))
    }

    /// Hide a project. Already-hidden projects keep their original `hidden_at`.
    pub async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE projects SET \
             hidden_at = CASE WHEN is_hidden THEN hidden_at ELSE $2 END, \
             is_hidden = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to hide project", e))?;
        Ok(result.rows_affected() > 0)
    }
}

async fn lock_project(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<LockedProject>> {
    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to lock project", e))?;
    let Some(project) = project else {
        return Ok(None);
    };

    let stages = sqlx::query_as::<_, DepartmentStageConfig>(
        "SELECT * FROM department_stage_configs WHERE project_id = $1 \
         ORDER BY department, week_start",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("Failed to load stage configs", e))?;

    let budgets = sqlx::query_as::<_, ProjectBudget>(
        "SELECT * FROM project_budgets WHERE project_id = $1 ORDER BY department",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("Failed to load budgets", e))?;

    Ok(Some(LockedProject {
        project,
        stages,
        budgets,
    }))
}

async fn write_children(
    conn: &mut PgConnection,
    project_id: Uuid,
    children: &ProjectChildren,
) -> AppResult<()> {
    if let Some(stages) = &children.stages {
        sqlx::query("DELETE FROM department_stage_configs WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to clear stage configs", e))?;

        for stage in stages {
            sqlx::query(
                "INSERT INTO department_stage_configs (project_id, department, stage, \
                 week_start, week_end, department_start_date, duration_weeks) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(project_id)
            .bind(stage.department)
            .bind(stage.stage)
            .bind(stage.week_start)
            .bind(stage.week_end)
            .bind(stage.department_start_date)
            .bind(stage.duration_weeks)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to insert stage config", e))?;
        }
    }

    if let Some(budgets) = &children.budget_hours {
        for (department, hours) in budgets {
            sqlx::query(
                "INSERT INTO project_budgets (project_id, department, hours_allocated) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (project_id, department) \
                 DO UPDATE SET hours_allocated = EXCLUDED.hours_allocated, updated_at = NOW()",
            )
            .bind(project_id)
            .bind(*department)
            .bind(*hours)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to upsert budget", e))?;
        }
    }

    Ok(())
}
