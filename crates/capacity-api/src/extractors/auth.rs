//! Authentication extractors: verified bearer claims, and the full request
//! context for an active session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use capacity_auth::{Claims, Principal};
use capacity_core::AppError;
use capacity_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims of a signature-checked access token. No session check.
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Authentication credentials were not provided."))?;

        let claims = state.sessions.decoder().decode_access_token(bearer.token())?;
        Ok(Self(claims))
    }
}

/// Extracted authenticated user context available in handlers.
///
/// The token must verify, its session must still be active, and the user
/// must exist and be active.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerClaims(claims) = BearerClaims::from_request_parts(parts, state).await?;

        if !state
            .sessions
            .is_session_active(claims.sub, claims.session_id)
            .await?
        {
            return Err(AppError::unauthorized("Session expired. Please log in again.").into());
        }

        let user = state
            .directory
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("User not found or inactive"))?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(AuthUser(RequestContext::new(
            Principal::from(&user),
            claims.session_id,
            ip_address,
            user_agent,
        )))
    }
}
