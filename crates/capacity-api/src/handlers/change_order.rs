//! Project change order handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::project::{ChangeOrderInput, ProjectChangeOrder};

use crate::dto::request::ProjectChildQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/project-change-orders/
pub async fn list_change_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<ProjectChildQuery>,
) -> ApiResult<Json<PageResponse<ProjectChangeOrder>>> {
    let rows = state
        .change_orders
        .list(&auth, query.project, query.department)
        .await?;
    Ok(Json(params.paginate(rows)))
}

/// GET /api/project-change-orders/{id}/
pub async fn get_change_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectChangeOrder>> {
    Ok(Json(state.change_orders.get(&auth, id).await?))
}

/// POST /api/project-change-orders/
pub async fn create_change_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangeOrderInput>,
) -> ApiResult<(StatusCode, Json<ProjectChangeOrder>)> {
    let row = state.change_orders.create(&auth, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/project-change-orders/{id}/
pub async fn update_change_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ChangeOrderInput>,
) -> ApiResult<Json<ProjectChangeOrder>> {
    Ok(Json(state.change_orders.update(&auth, id, &input).await?))
}

/// DELETE /api/project-change-orders/{id}/
pub async fn delete_change_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.change_orders.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
