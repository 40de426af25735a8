//! Project handlers. Create and update accept the composite payload as raw
//! JSON so the department policy can see exactly which keys were sent.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_database::repositories::ProjectFilter;
use capacity_entity::project::{Facility, Project};

use crate::dto::request::ProjectQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/projects/
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Json<PageResponse<Project>>> {
    let facility = query
        .facility
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(str::parse::<Facility>)
        .transpose()?;

    let filter = ProjectFilter {
        include_hidden: query.include_hidden(),
        facility,
        start_from: query.start_from,
        end_until: query.end_until,
        search: query.search.clone().filter(|s| !s.trim().is_empty()),
    };
    let page = state
        .projects
        .list(&auth, &filter, &params.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/projects/{id}/
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Json<Project>> {
    Ok(Json(
        state
            .projects
            .get(&auth, id, query.include_hidden())
            .await?,
    ))
}

/// POST /api/projects/
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.projects.create(&auth, &body).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT|PATCH /api/projects/{id}/
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.update(&auth, id, &body).await?))
}

/// DELETE /api/projects/{id}/
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
