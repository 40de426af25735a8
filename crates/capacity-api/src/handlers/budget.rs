//! Project budget handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::project::{BudgetHoursPatch, ProjectBudget};

use crate::dto::request::{BudgetHoursRequest, BudgetRequest, ProjectChildQuery};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/project-budgets/
pub async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<ProjectChildQuery>,
) -> ApiResult<Json<PageResponse<ProjectBudget>>> {
    let mut rows = state.budgets.list(&auth, query.project).await?;
    if let Some(department) = query.department {
        rows.retain(|b| b.department == department);
    }
    Ok(Json(params.paginate(rows)))
}

/// GET /api/project-budgets/{id}/
pub async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectBudget>> {
    Ok(Json(state.budgets.get(&auth, id).await?))
}

/// POST /api/project-budgets/
pub async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BudgetRequest>,
) -> ApiResult<(StatusCode, Json<ProjectBudget>)> {
    let budget = state
        .budgets
        .create(&auth, req.project_id, req.department, &req.hours)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// PUT|PATCH /api/project-budgets/{id}/
pub async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(hours): Json<BudgetHoursPatch>,
) -> ApiResult<Json<ProjectBudget>> {
    Ok(Json(state.budgets.update(&auth, id, &hours).await?))
}

/// PATCH /api/project-budgets/update_budget_hours/
pub async fn update_budget_hours(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BudgetHoursRequest>,
) -> ApiResult<Json<ProjectBudget>> {
    let budget = state
        .budgets
        .update_budget_hours(&auth, req.project_id, req.department, &req.hours)
        .await?;
    Ok(Json(budget))
}

/// DELETE /api/project-budgets/{id}/
pub async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.budgets.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
