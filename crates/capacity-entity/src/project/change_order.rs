//! Change orders quoted against a project department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::department::Department;

/// A change order; `(project, department, name)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectChangeOrder {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Department quoting the change.
    pub department: Department,
    /// Change order name (e.g. `CO01`).
    pub name: String,
    /// Quoted hours.
    pub hours_quoted: f64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Writable change order fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOrderInput {
    /// Owning project.
    pub project_id: Uuid,
    /// Department quoting the change.
    pub department: Department,
    /// Change order name.
    pub name: String,
    /// Quoted hours (>= 0).
    pub hours_quoted: f64,
}

impl ChangeOrderInput {
    /// Name present and quoted hours non-negative.
    pub fn check(&self) -> capacity_core::AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(capacity_core::AppError::validation("Change order name is required."));
        }
        if !(self.hours_quoted >= 0.0 && self.hours_quoted.is_finite()) {
            return Err(capacity_core::AppError::validation(
                "Quoted hours cannot be negative.",
            ));
        }
        Ok(())
    }
}
