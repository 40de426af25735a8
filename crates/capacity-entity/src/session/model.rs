//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated device of a user.
///
/// Sessions are created on login and flipped to inactive by logout,
/// password changes, or the inactivity sweep. Rows are never deleted by
/// the application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    /// Unique session identifier, also carried as the `session_id` claim.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    /// Device metadata captured at login (user agent, IP).
    pub device_info: serde_json::Value,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last authenticated request seen on this session.
    pub last_activity: DateTime<Utc>,
    /// Whether this session still authorizes requests.
    pub is_active: bool,
}

impl UserSession {
    /// Whether the last activity is strictly older than `cutoff`.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity < cutoff
    }

    /// Idle time in seconds relative to `now`.
    pub fn idle_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity).num_seconds().max(0)
    }
}

/// Free-form device metadata recorded on login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// User-Agent header value.
    pub user_agent: String,
    /// Client IP address.
    pub ip_address: String,
}

impl DeviceInfo {
    /// Convert to the JSON stored on the session row.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "user_agent": self.user_agent,
            "ip_address": self.ip_address,
        })
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Pre-generated identifier, embedded in the access token before insert.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token.
    pub refresh_token_hash: String,
    /// Device metadata.
    pub device_info: DeviceInfo,
}
