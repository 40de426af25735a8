//! Activity log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The acting user; cleared if the user is deleted.
    pub user_id: Option<Uuid>,
    /// Action performed (e.g. `"updated"`).
    pub action: String,
    /// Model affected (e.g. `"Project"`).
    pub model_name: String,
    /// Identifier of the affected object.
    pub object_id: String,
    /// JSON of the changes made.
    pub changes: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create an activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityLog {
    /// The acting user.
    pub user_id: Uuid,
    /// Action performed.
    pub action: String,
    /// Model affected.
    pub model_name: String,
    /// Identifier of the affected object.
    pub object_id: String,
    /// JSON of the changes made.
    pub changes: Option<serde_json::Value>,
}
