//! Liveness endpoint.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

const DATABASE_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /api/health/
///
/// Always answers 200; `database` reports whether a trivial query succeeded.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = sqlx::query("SELECT 1").execute(&state.db_pool);
    let database = match tokio::time::timeout(DATABASE_PROBE_TIMEOUT, probe).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "Health check: database query failed");
            false
        }
        Err(_) => {
            warn!("Health check: database probe timed out");
            false
        }
    };

    let status = if database { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
