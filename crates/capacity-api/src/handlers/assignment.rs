//! Assignment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::assignment::{Assignment, AssignmentInput};

use crate::dto::request::AssignmentQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/assignments/
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<AssignmentQuery>,
) -> ApiResult<Json<PageResponse<Assignment>>> {
    let page = state
        .assignments
        .list(&auth, &query.filter(), &params.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/assignments/{id}/
pub async fn get_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Assignment>> {
    Ok(Json(state.assignments.get(&auth, id).await?))
}

/// POST /api/assignments/
pub async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AssignmentInput>,
) -> ApiResult<(StatusCode, Json<Assignment>)> {
    let assignment = state.assignments.create(&auth, &input).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PUT /api/assignments/{id}/
pub async fn update_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<AssignmentInput>,
) -> ApiResult<Json<Assignment>> {
    Ok(Json(state.assignments.update(&auth, id, &input).await?))
}

/// DELETE /api/assignments/{id}/
pub async fn delete_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.assignments.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
