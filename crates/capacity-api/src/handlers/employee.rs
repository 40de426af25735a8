//! Employee handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::employee::{Employee, EmployeeInput};

use crate::dto::request::EmployeeQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/employees/
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<EmployeeQuery>,
) -> ApiResult<Json<PageResponse<Employee>>> {
    let page = state
        .employees
        .list(&auth, &query.filter(), &params.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/employees/{id}/
pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.employees.get(&auth, id).await?))
}

/// POST /api/employees/
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let employee = state.employees.create(&auth, &input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/employees/{id}/
pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.employees.update(&auth, id, &input).await?))
}

/// DELETE /api/employees/{id}/
pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.employees.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
