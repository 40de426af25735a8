//! Project reads and composite writes.
//!
//! A project body carries shared fields plus per-department stage rows and
//! budget hours. The whole body is authorized before anything is written,
//! and the write itself is one transaction in the repository.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::{
    CurrentProjectState, ProjectPayload, authorize_hidden_data_access, authorize_project_create,
    authorize_project_update, payload_of, require_full_access,
};
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{
    LockedProject, ProjectFilter, ProjectRepository, ProjectWrite,
};
use capacity_entity::department::Department;
use capacity_entity::project::{Project, ProjectChildren, ProjectFields};

use super::fields::merge_fields;
use crate::context::RequestContext;

/// Project service.
#[derive(Debug, Clone)]
pub struct ProjectService {
    projects: Arc<ProjectRepository>,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(projects: Arc<ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Lists projects. Hidden ones need full access and an explicit flag.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &ProjectFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        authorize_hidden_data_access(&ctx.tier, filter.include_hidden)?;
        self.projects.find_all(filter, page).await
    }

    /// Gets one project. A hidden project reads as missing unless requested.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid, include_hidden: bool) -> AppResult<Project> {
        authorize_hidden_data_access(&ctx.tier, include_hidden)?;
        let project = self.load(id).await?;
        if project.is_hidden && !include_hidden {
            return Err(not_found(id));
        }
        Ok(project)
    }

    /// Creates a project from a raw body.
    pub async fn create(&self, ctx: &RequestContext, body: &Value) -> AppResult<Project> {
        let payload = payload_of(body)?;
        authorize_project_create(&ctx.tier, &payload)?;

        let fields = merge_fields(&payload, None)?;
        let children = payload.children()?;
        let visible: Vec<Department> = payload
            .visible_departments()
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        let project = self.projects.create(&fields, &visible, &children).await?;
        info!(
            user_id = %ctx.user_id,
            project_id = %project.id,
            tier = ctx.tier.label(),
            "Project created"
        );
        Ok(project)
    }

    /// Applies a full or partial body to a project.
    ///
    /// Absent keys keep their stored values. Stage rows are replaced only when a
    /// non-empty stage object is sent; budgets are upserted per department key.
    /// Authorization runs against the state read under the project row lock.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, body: &Value) -> AppResult<Project> {
        let payload = payload_of(body)?;
        let children = payload.children()?;

        let updated = self
            .projects
            .update_with(id, |locked| {
                decide_update(ctx, locked, &payload, children.clone())
            })
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(
            user_id = %ctx.user_id,
            project_id = %id,
            stages_replaced = children.stages.is_some(),
            budgets_written = children.budget_hours.as_ref().map_or(0, Vec::len),
            "Project updated"
        );
        Ok(updated)
    }

    /// Hides a project. Full access only.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        require_full_access(&ctx.tier, "projects")?;
        if !self.projects.soft_delete(id, Utc::now()).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, project_id = %id, "Project hidden");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<Project> {
        self.projects.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn decide_update(
    ctx: &RequestContext,
    locked: &LockedProject,
    payload: &ProjectPayload<'_>,
    children: ProjectChildren,
) -> AppResult<ProjectWrite> {
    let project = &locked.project;
    if project.is_hidden {
        require_full_access(&ctx.tier, "hidden projects")?;
    }

    let current = CurrentProjectState {
        project,
        stages: &locked.stages,
        budgets: &locked.budgets,
    };
    authorize_project_update(&ctx.tier, &current, payload)?;

    let fields = merge_fields(payload, Some(&ProjectFields::from_project(project)))?;
    let visible_in_departments = match payload.visible_departments() {
        Some(set) => set.into_iter().collect(),
        None => project.visible_in_departments.0.clone(),
    };
    Ok(ProjectWrite {
        fields,
        visible_in_departments,
        children,
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Project {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context::context;
    use crate::test_support::lazy_pool;
    use capacity_core::ErrorKind;
    use capacity_entity::department::{OtherDepartment, UserDepartment};
    use capacity_entity::project::{DepartmentStageConfig, Facility, Stage};
    use serde_json::json;
    use sqlx::types::Json;

    fn service() -> ProjectService {
        ProjectService::new(Arc::new(ProjectRepository::new(lazy_pool())))
    }

    fn body() -> Value {
        json!({
            "name": "Line 4",
            "client": "ACME",
            "start_date": "2025-01-06",
            "end_date": "2025-06-30",
            "facility": "AL",
            "number_of_weeks": 26,
            "department_hours_allocated": { "PRG": 120 },
        })
    }

    #[tokio::test]
    async fn test_scoped_create_for_other_department_denied() {
        let ctx = context(Some(UserDepartment::Med), None);
        let err = service().create(&ctx, &body()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_read_only_create_denied() {
        let ctx = context(
            Some(UserDepartment::Other),
            Some(OtherDepartment::HeadEngineering),
        );
        let err = service().create(&ctx, &body()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_non_object_body_is_validation_error() {
        let ctx = context(Some(UserDepartment::Pm), None);
        let err = service().create(&ctx, &json!([1, 2])).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_hidden_listing_and_delete_need_full_access() {
        let ctx = context(Some(UserDepartment::Hd), None);
        let filter = ProjectFilter {
            include_hidden: true,
            ..ProjectFilter::default()
        };
        let err = service()
            .list(&ctx, &filter, &PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = service().delete(&ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    fn locked(stage_departments: &[Department]) -> LockedProject {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: "Line 4".to_string(),
            client: "ACME".to_string(),
            start_date: "2025-01-06".parse().unwrap(),
            end_date: "2025-06-30".parse().unwrap(),
            facility: Facility::Al,
            number_of_weeks: 26,
            project_manager_id: None,
            visible_in_departments: Json(vec![Department::Med]),
            is_high_probability: false,
            is_hidden: false,
            hidden_at: None,
            created_at: now,
            updated_at: now,
        };
        let stages = stage_departments
            .iter()
            .map(|dept| DepartmentStageConfig {
                id: Uuid::new_v4(),
                project_id: project.id,
                department: *dept,
                stage: Some(Stage::Concept),
                week_start: 1,
                week_end: 2,
                department_start_date: None,
                duration_weeks: None,
                created_at: now,
                updated_at: now,
            })
            .collect();
        LockedProject {
            project,
            stages,
            budgets: Vec::new(),
        }
    }

    fn med_stage_body() -> Value {
        json!({
            "department_stages": {
                "MED": [{"stage": "CONCEPT", "week_start": 1, "week_end": 2}]
            }
        })
    }

    #[test]
    fn test_update_decision_allows_own_department_stages() {
        let ctx = context(Some(UserDepartment::Med), None);
        let body = med_stage_body();
        let payload = payload_of(&body).unwrap();
        let write = decide_update(
            &ctx,
            &locked(&[Department::Med]),
            &payload,
            payload.children().unwrap(),
        )
        .unwrap();
        assert_eq!(write.fields.name, "Line 4");
        assert_eq!(write.visible_in_departments, vec![Department::Med]);
        assert_eq!(write.children.stages.map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_update_decision_sees_rows_written_by_another_department() {
        // HD stages committed before the lock was taken would be dropped by a
        // MED-only stage replacement, so the MED write must be refused.
        let ctx = context(Some(UserDepartment::Med), None);
        let body = med_stage_body();
        let payload = payload_of(&body).unwrap();
        let err = decide_update(
            &ctx,
            &locked(&[Department::Med, Department::Hd]),
            &payload,
            payload.children().unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_update_decision_on_hidden_project_needs_full_access() {
        let body = json!({"department_hours_allocated": {"MED": 10}});
        let payload = payload_of(&body).unwrap();
        let mut state = locked(&[]);
        state.project.is_hidden = true;

        let med = context(Some(UserDepartment::Med), None);
        let err = decide_update(&med, &state, &payload, payload.children().unwrap()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let pm = context(Some(UserDepartment::Pm), None);
        assert!(decide_update(&pm, &state, &payload, payload.children().unwrap()).is_ok());
    }
}
