//! Handlers for the four weekly capacity tables.
//!
//! Each table is one [`CapacityEndpoint`]; the handlers are generic over it
//! and the router instantiates them per path.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_database::repositories::{
    PrgExternalCapacityRepository, ScioCapacityRepository, SubcontractedCapacityRepository,
    WeeklyTotalRepository,
};
use capacity_service::WeeklyCapacityService;
use capacity_service::capacity::WeeklyTable;

use crate::dto::request::{
    CompanyWeekQuery, DepartmentWeekQuery, PrgExternalCapacityRequest, ScioCapacityRequest,
    SubcontractedCapacityRequest, TeamWeekQuery, WeekRange, WeeklyTotalRequest,
};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// Binds a weekly table to its request shapes and its service in the state.
pub trait CapacityEndpoint: WeeklyTable + Sized + 'static {
    /// Create/update body.
    type Body: DeserializeOwned + Send + 'static;
    /// List query.
    type Filter: DeserializeOwned + Send + 'static;

    /// The table's service.
    fn service(state: &AppState) -> &WeeklyCapacityService<Self>;

    /// Split a body into key, week, and value.
    fn split(body: Self::Body) -> (Self::Key, NaiveDate, Self::Value);

    /// Split a list query into key and week range.
    fn filter(query: Self::Filter) -> (Option<Self::Key>, WeekRange);
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CapacityEndpoint for ScioCapacityRepository {
    type Body = ScioCapacityRequest;
    type Filter = DepartmentWeekQuery;

    fn service(state: &AppState) -> &WeeklyCapacityService<Self> {
        &state.scio_capacity
    }

    fn split(body: Self::Body) -> (Self::Key, NaiveDate, Self::Value) {
        (body.department, body.week_start_date, body.capacity)
    }

    fn filter(query: Self::Filter) -> (Option<Self::Key>, WeekRange) {
        (query.department, query.weeks)
    }
}

impl CapacityEndpoint for SubcontractedCapacityRepository {
    type Body = SubcontractedCapacityRequest;
    type Filter = CompanyWeekQuery;

    fn service(state: &AppState) -> &WeeklyCapacityService<Self> {
        &state.subcontracted_capacity
    }

    fn split(body: Self::Body) -> (Self::Key, NaiveDate, Self::Value) {
        (body.company, body.week_start_date, body.capacity)
    }

    fn filter(query: Self::Filter) -> (Option<Self::Key>, WeekRange) {
        (non_blank(query.company), query.weeks)
    }
}

impl CapacityEndpoint for PrgExternalCapacityRepository {
    type Body = PrgExternalCapacityRequest;
    type Filter = TeamWeekQuery;

    fn service(state: &AppState) -> &WeeklyCapacityService<Self> {
        &state.prg_external_capacity
    }

    fn split(body: Self::Body) -> (Self::Key, NaiveDate, Self::Value) {
        (body.team_name, body.week_start_date, body.capacity)
    }

    fn filter(query: Self::Filter) -> (Option<Self::Key>, WeekRange) {
        (non_blank(query.team_name), query.weeks)
    }
}

impl CapacityEndpoint for WeeklyTotalRepository {
    type Body = WeeklyTotalRequest;
    type Filter = DepartmentWeekQuery;

    fn service(state: &AppState) -> &WeeklyCapacityService<Self> {
        &state.weekly_totals
    }

    fn split(body: Self::Body) -> (Self::Key, NaiveDate, Self::Value) {
        (body.department, body.week_start_date, body.total_hours)
    }

    fn filter(query: Self::Filter) -> (Option<Self::Key>, WeekRange) {
        (query.department, query.weeks)
    }
}

/// GET /api/<table>/
pub async fn list_rows<T: CapacityEndpoint>(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<T::Filter>,
) -> ApiResult<Json<PageResponse<T::Row>>> {
    let (key, weeks) = T::filter(query);
    let rows = T::service(&state)
        .list(&auth, key, weeks.week_from, weeks.week_until)
        .await?;
    Ok(Json(params.paginate(rows)))
}

/// GET /api/<table>/{id}/
pub async fn get_row<T: CapacityEndpoint>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<T::Row>> {
    Ok(Json(T::service(&state).get(&auth, id).await?))
}

/// POST /api/<table>/
///
/// Overwrites the existing row for the same key and week.
pub async fn create_row<T: CapacityEndpoint>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<T::Body>,
) -> ApiResult<(StatusCode, Json<T::Row>)> {
    let (key, week, value) = T::split(body);
    let row = T::service(&state).create(&auth, key, week, value).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/<table>/{id}/
pub async fn update_row<T: CapacityEndpoint>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<T::Body>,
) -> ApiResult<Json<T::Row>> {
    let (key, week, value) = T::split(body);
    Ok(Json(
        T::service(&state)
            .update(&auth, id, key, week, value)
            .await?,
    ))
}

/// DELETE /api/<table>/{id}/
pub async fn delete_row<T: CapacityEndpoint>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    T::service(&state).delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
