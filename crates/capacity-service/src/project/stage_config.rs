//! Department stage rows edited one at a time. Full access only for writes.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::require_full_access;
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::StageConfigRepository;
use capacity_entity::department::Department;
use capacity_entity::project::{DepartmentStageConfig, NewStageConfig};

use crate::context::RequestContext;

const RESOURCE: &str = "department stages";

/// Stage configuration service.
#[derive(Debug, Clone)]
pub struct StageConfigService {
    stages: Arc<StageConfigRepository>,
}

impl StageConfigService {
    /// Creates a new stage configuration service.
    pub fn new(stages: Arc<StageConfigRepository>) -> Self {
        Self { stages }
    }

    /// Rows filtered by project and/or department.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        project_id: Option<Uuid>,
        department: Option<Department>,
    ) -> AppResult<Vec<DepartmentStageConfig>> {
        self.stages.find_filtered(project_id, department).await
    }

    /// Gets one row.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<DepartmentStageConfig> {
        self.stages.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Adds a row to a project.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        data: &NewStageConfig,
    ) -> AppResult<DepartmentStageConfig> {
        require_full_access(&ctx.tier, RESOURCE)?;
        data.check()?;
        let row = self.stages.create(project_id, data).await?;
        info!(user_id = %ctx.user_id, stage_config_id = %row.id, "Stage config created");
        Ok(row)
    }

    /// Replaces a row.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: &NewStageConfig,
    ) -> AppResult<DepartmentStageConfig> {
        require_full_access(&ctx.tier, RESOURCE)?;
        data.check()?;
        let row = self.stages.update(id, data).await?.ok_or_else(|| not_found(id))?;
        info!(user_id = %ctx.user_id, stage_config_id = %id, "Stage config updated");
        Ok(row)
    }

    /// Deletes a row.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        require_full_access(&ctx.tier, RESOURCE)?;
        if !self.stages.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, stage_config_id = %id, "Stage config deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Stage config {id} not found"))
}
