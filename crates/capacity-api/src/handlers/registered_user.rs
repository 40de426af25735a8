//! Registered-user administration, limited to business intelligence staff.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use capacity_core::AppError;
use capacity_core::types::pagination::PageResponse;
use capacity_entity::user::User;
use capacity_service::UpdateRegisteredUser;

use crate::dto::request::ResetPasswordRequest;
use crate::dto::response::LogoutResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/registered-users/
pub async fn list_registered_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<User>>> {
    let page = state
        .registered_users
        .list(&auth, &params.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/registered-users/{id}/
pub async fn get_registered_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.registered_users.get(&auth, id).await?))
}

/// PUT|PATCH /api/registered-users/{id}/
pub async fn update_registered_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<UpdateRegisteredUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state.registered_users.update(&auth, id, &changes).await?,
    ))
}

/// POST /api/registered-users/{id}/reset-password/
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<LogoutResponse>> {
    req.validate()?;
    if req
        .confirm_password
        .as_deref()
        .is_some_and(|c| c != req.new_password)
    {
        return Err(AppError::validation("Passwords do not match.").into());
    }

    let closed = state
        .registered_users
        .reset_password(&auth, id, &req.new_password)
        .await?;
    Ok(Json(LogoutResponse {
        message: "Password reset. The user must log in again.".to_string(),
        sessions_closed: closed,
    }))
}

/// DELETE /api/registered-users/{id}/
pub async fn delete_registered_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.registered_users.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
