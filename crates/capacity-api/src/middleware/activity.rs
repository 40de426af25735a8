//! Session activity tracking: sweep idle sessions and touch the caller's
//! session before every request outside the auth bootstrap endpoints.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::state::AppState;

/// Paths that never count as activity.
pub const EXCLUDED_PATHS: &[&str] = &[
    "/api/token/",
    "/api/token/refresh/",
    "/api/register/",
    "/api/verify-email/",
    "/api/verify-code/",
    "/api/session-status/",
];

/// Whether a request to `path` is tracked.
pub fn is_tracked(path: &str) -> bool {
    !EXCLUDED_PATHS.contains(&path)
}

/// Runs [`SessionRegistry::track_activity`](capacity_auth::SessionRegistry::track_activity)
/// and always passes the request on.
pub async fn track_activity(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_tracked(request.uri().path()) {
        let bearer = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        state.sessions.track_activity(bearer, Utc::now()).await;
    }
    next.run(request).await
}
