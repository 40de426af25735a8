//! Employee entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::department::Department;

/// Upper bound for weekly capacity hours.
pub const MAX_WEEKLY_CAPACITY: f64 = 168.0;

/// A team member whose hours are planned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: Uuid,
    /// Linked login account, if any.
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Job title.
    pub role: String,
    /// Owning department.
    pub department: Department,
    /// Available hours per week.
    pub capacity: f64,
    /// Whether the employee is currently active.
    pub is_active: bool,
    /// Subcontracted material (BUILD only).
    pub is_subcontracted_material: bool,
    /// Company name when subcontracted.
    pub subcontract_company: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Writable employee fields, used for both create and full update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// Display name.
    pub name: String,
    /// Job title.
    pub role: String,
    /// Owning department.
    pub department: Department,
    /// Available hours per week (0..=168).
    pub capacity: f64,
    /// Active flag.
    pub is_active: bool,
    /// Subcontracted material flag.
    pub is_subcontracted_material: bool,
    /// Subcontract company.
    pub subcontract_company: Option<String>,
    /// Linked login account.
    pub user_id: Option<Uuid>,
}

impl EmployeeInput {
    /// Name present and capacity within a week.
    pub fn check(&self) -> capacity_core::AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(capacity_core::AppError::validation("Employee name is required."));
        }
        if !(0.0..=MAX_WEEKLY_CAPACITY).contains(&self.capacity) {
            return Err(capacity_core::AppError::validation(format!(
                "Capacity must be between 0 and {MAX_WEEKLY_CAPACITY} hours."
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, capacity: f64) -> EmployeeInput {
        EmployeeInput {
            name: name.to_string(),
            role: "Designer".to_string(),
            department: Department::Med,
            capacity,
            is_active: true,
            is_subcontracted_material: false,
            subcontract_company: None,
            user_id: None,
        }
    }

    #[test]
    fn test_check_capacity_bounds() {
        assert!(input("Ana Ruiz", 45.0).check().is_ok());
        assert!(input("Ana Ruiz", 168.0).check().is_ok());
        assert!(input("Ana Ruiz", 168.5).check().is_err());
        assert!(input("Ana Ruiz", -1.0).check().is_err());
        assert!(input("Ana Ruiz", f64::NAN).check().is_err());
        assert!(input("  ", 40.0).check().is_err());
    }
}
