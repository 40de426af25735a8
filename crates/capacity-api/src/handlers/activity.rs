//! Activity log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use capacity_core::types::pagination::PageResponse;
use capacity_entity::activity::ActivityLog;
use capacity_service::NewActivity;

use crate::dto::request::ActivityQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/activity-logs/
pub async fn list_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<PageResponse<ActivityLog>>> {
    let page = state
        .activity_logs
        .list(
            &auth,
            query.user,
            query.model_name.as_deref().filter(|m| !m.is_empty()),
            &params.page_request(),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/activity-logs/{id}/
pub async fn get_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ActivityLog>> {
    Ok(Json(state.activity_logs.get(&auth, id).await?))
}

/// POST /api/activity-logs/
pub async fn record_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(entry): Json<NewActivity>,
) -> ApiResult<(StatusCode, Json<ActivityLog>)> {
    let log = state.activity_logs.record(&auth, entry).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
