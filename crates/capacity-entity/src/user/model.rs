//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::department::{Department, OtherDepartment, UserDepartment};

/// A registered user of the capacity planner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Staff flag; grants full access.
    pub is_staff: bool,
    /// Superuser flag; grants full access and user management.
    pub is_superuser: bool,
    /// Department recorded on the profile.
    pub department: Option<UserDepartment>,
    /// Sub-classification when `department` is `OTHER`.
    pub other_department: Option<OtherDepartment>,
    /// Department of the linked employee row, if any.
    #[sqlx(default)]
    pub employee_department: Option<Department>,
    /// Last successful login time.
    pub last_login: Option<DateTime<Utc>>,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Full display name, falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Profile department.
    pub department: Option<UserDepartment>,
    /// Sub-classification for `OTHER`.
    pub other_department: Option<OtherDepartment>,
}

/// Administrative profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserProfile {
    /// New email address.
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New profile department.
    pub department: Option<UserDepartment>,
    /// New sub-classification.
    pub other_department: Option<OtherDepartment>,
}
