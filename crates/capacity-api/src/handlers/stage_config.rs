//! Department stage handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::project::DepartmentStageConfig;

use crate::dto::request::{ProjectChildQuery, StageConfigRequest};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/department-stages/
pub async fn list_stage_configs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<ProjectChildQuery>,
) -> ApiResult<Json<PageResponse<DepartmentStageConfig>>> {
    let rows = state
        .stage_configs
        .list(&auth, query.project, query.department)
        .await?;
    Ok(Json(params.paginate(rows)))
}

/// GET /api/department-stages/{id}/
pub async fn get_stage_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DepartmentStageConfig>> {
    Ok(Json(state.stage_configs.get(&auth, id).await?))
}

/// POST /api/department-stages/
pub async fn create_stage_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<StageConfigRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentStageConfig>)> {
    let row = state
        .stage_configs
        .create(&auth, req.project_id, &req.config)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/department-stages/{id}/
pub async fn update_stage_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StageConfigRequest>,
) -> ApiResult<Json<DepartmentStageConfig>> {
    Ok(Json(state.stage_configs.update(&auth, id, &req.config).await?))
}

/// DELETE /api/department-stages/{id}/
pub async fn delete_stage_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.stage_configs.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
