//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use capacity_auth::{AccessTier, SessionStatus};
use capacity_entity::department::{OtherDepartment, UserDepartment};
use capacity_entity::user::User;

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User summary returned on login.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Profile department.
    pub department: Option<UserDepartment>,
    /// Sub-classification under `OTHER`.
    pub other_department: Option<OtherDepartment>,
    /// Resolved access tier.
    pub access: AccessTier,
}

impl UserSummary {
    /// Summary with an already resolved tier.
    pub fn new(user: &User, access: AccessTier) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            department: user.department,
            other_department: user.other_department,
            access,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// Access token TTL in seconds.
    pub access_expires_in: u64,
    /// The session the tokens belong to.
    pub session_id: Uuid,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Session status answer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusResponse {
    /// `active` or `inactive`.
    pub status: SessionStatus,
    /// Human-readable detail.
    pub detail: String,
    /// The token's subject.
    pub user: Uuid,
    /// The token's session, if it carries one.
    pub session_id: Option<Uuid>,
}

/// Logout answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Message text.
    pub message: String,
    /// Number of sessions closed.
    pub sessions_closed: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Database reachability.
    pub database: bool,
    /// Crate version.
    pub version: String,
}
