//! Self-service registration.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use capacity_entity::user::User;
use capacity_service::RegisterRequest;

use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/register/
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.registration.register(&req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
