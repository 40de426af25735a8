//! Auth handlers: login, refresh, logout, session status, password change.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use validator::Validate;

use capacity_auth::{ChangePassword, SessionStatus, resolve_access};
use capacity_core::AppError;
use capacity_entity::session::{DeviceInfo, TokenPair};

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{
    LoginResponse, LogoutResponse, MessageResponse, SessionStatusResponse, UserSummary,
};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, BearerClaims};
use crate::state::AppState;

fn device_info(headers: &HeaderMap) -> DeviceInfo {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    DeviceInfo {
        user_agent: header("user-agent").unwrap_or_default(),
        ip_address: header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .unwrap_or_default(),
    }
}

/// POST /api/token/
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let outcome = state
        .sessions
        .login(&req.username, &req.password, device_info(&headers), Utc::now())
        .await?;

    let access = resolve_access(&(&outcome.user).into());
    Ok(Json(LoginResponse {
        access: outcome.tokens.access,
        refresh: outcome.tokens.refresh,
        access_expires_in: outcome.tokens.access_expires_in,
        session_id: outcome.session.id,
        user: UserSummary::new(&outcome.user, access),
    }))
}

/// POST /api/token/refresh/
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    req.validate()?;
    let tokens = state.sessions.refresh(&req.refresh, Utc::now()).await?;
    Ok(Json(tokens))
}

/// POST /api/logout/
///
/// The body is optional; when present it may name the refresh token.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> ApiResult<Json<LogoutResponse>> {
    let req: LogoutRequest = if body.iter().all(u8::is_ascii_whitespace) {
        LogoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };

    let closed = state
        .sessions
        .logout(auth.user_id, auth.session_id, req.refresh.as_deref())
        .await?;

    Ok(Json(LogoutResponse {
        message: "Successfully logged out.".to_string(),
        sessions_closed: closed,
    }))
}

/// GET /api/session-status/
///
/// Answers 200 while the caller's session is active and 401 once it is not.
pub async fn session_status(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> ApiResult<(StatusCode, Json<SessionStatusResponse>)> {
    let status = state
        .sessions
        .check_status(claims.sub, claims.session_id, Utc::now())
        .await?;

    let (code, detail) = match status {
        SessionStatus::Active => (StatusCode::OK, "Session is active."),
        SessionStatus::Inactive => (
            StatusCode::UNAUTHORIZED,
            "Session expired due to inactivity or logout.",
        ),
    };
    Ok((
        code,
        Json(SessionStatusResponse {
            status,
            detail: detail.to_string(),
            user: claims.sub,
            session_id: claims.session_id,
        }),
    ))
}

/// POST /api/change-password/
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePassword>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.change_password(auth.user_id, &req).await?;
    Ok(Json(MessageResponse::new(
        "Password changed. Please log in again on every device.",
    )))
}

/// POST /api/verify-email/ and /api/verify-code/
pub async fn verification_unavailable() -> ApiResult<Json<MessageResponse>> {
    Err(AppError::not_found("Email verification is not available on this server.").into())
}
