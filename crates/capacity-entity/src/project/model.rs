//! Project entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::facility::Facility;
use crate::department::Department;

/// Longest schedulable project, in weeks (five years).
pub const MAX_PROJECT_WEEKS: i32 = 260;

/// A customer project whose hours are planned per department.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Customer name.
    pub client: String,
    /// First day of the project.
    pub start_date: NaiveDate,
    /// Last day of the project.
    pub end_date: NaiveDate,
    /// Executing site.
    pub facility: Facility,
    /// Planned duration in weeks.
    pub number_of_weeks: i32,
    /// Managing employee.
    pub project_manager_id: Option<Uuid>,
    /// Departments where a quick-created project is shown.
    pub visible_in_departments: Json<Vec<Department>>,
    /// Flag for visual prioritization.
    pub is_high_probability: bool,
    /// Soft-deleted projects are hidden from normal listings.
    pub is_hidden: bool,
    /// When the project was hidden.
    pub hidden_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The shared (non-department) fields of a project write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFields {
    /// Project name.
    pub name: String,
    /// Customer name.
    pub client: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day; must be after `start_date`.
    pub end_date: NaiveDate,
    /// Executing site.
    pub facility: Facility,
    /// Duration in weeks (1..=260).
    pub number_of_weeks: i32,
    /// Managing employee.
    pub project_manager_id: Option<Uuid>,
    /// Prioritization flag.
    pub is_high_probability: bool,
}

impl ProjectFields {
    /// Copy the current shared fields of an existing project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client: project.client.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            facility: project.facility,
            number_of_weeks: project.number_of_weeks,
            project_manager_id: project.project_manager_id,
            is_high_probability: project.is_high_probability,
        }
    }

    /// Check date ordering and week count.
    pub fn check(&self) -> capacity_core::AppResult<()> {
        if self.start_date >= self.end_date {
            return Err(capacity_core::AppError::validation(
                "End date must be after start date.",
            ));
        }
        if !(1..=MAX_PROJECT_WEEKS).contains(&self.number_of_weeks) {
            return Err(capacity_core::AppError::validation(format!(
                "Number of weeks must be between 1 and {MAX_PROJECT_WEEKS}."
            )));
        }
        Ok(())
    }
}

/// Per-department children written together with a project.
///
/// `None` leaves the existing rows untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectChildren {
    /// Full replacement of every stage row of the project.
    pub stages: Option<Vec<super::stage_config::NewStageConfig>>,
    /// Budget upserts; every listed department gets a row, zero included.
    pub budget_hours: Option<Vec<(Department, f64)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(start: &str, end: &str, weeks: i32) -> ProjectFields {
        ProjectFields {
            name: "Line 4".to_string(),
            client: "ACME".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            facility: Facility::Al,
            number_of_weeks: weeks,
            project_manager_id: None,
            is_high_probability: false,
        }
    }

    #[test]
    fn test_check_dates_and_weeks() {
        assert!(fields("2025-01-06", "2025-03-31", 12).check().is_ok());
        assert!(fields("2025-03-31", "2025-01-06", 12).check().is_err());
        assert!(fields("2025-01-06", "2025-01-06", 12).check().is_err());
        assert!(fields("2025-01-06", "2025-03-31", 0).check().is_err());
        assert!(fields("2025-01-06", "2025-03-31", 261).check().is_err());
    }
}
