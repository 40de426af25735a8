//! Assignment entity model.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use capacity_core::{AppError, AppResult};

use crate::project::Stage;

/// Tolerance when comparing the hours breakdown against the total.
const BREAKDOWN_TOLERANCE: f64 = 0.01;

/// Hours of one employee on one project for one week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    /// Unique row identifier.
    pub id: Uuid,
    /// Assigned employee.
    pub employee_id: Uuid,
    /// Target project.
    pub project_id: Uuid,
    /// Monday of the planned week.
    pub week_start_date: NaiveDate,
    /// Total hours.
    pub hours: f64,
    /// Internal SCIO share of `hours`.
    pub scio_hours: Option<f64>,
    /// External share of `hours`.
    pub external_hours: Option<f64>,
    /// Work stage.
    pub stage: Option<Stage>,
    /// Free-form comment.
    pub comment: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Writable assignment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentInput {
    /// Assigned employee.
    pub employee_id: Uuid,
    /// Target project.
    pub project_id: Uuid,
    /// Monday of the planned week.
    pub week_start_date: NaiveDate,
    /// Total hours.
    pub hours: f64,
    /// Internal share.
    pub scio_hours: Option<f64>,
    /// External share.
    pub external_hours: Option<f64>,
    /// Work stage.
    pub stage: Option<Stage>,
    /// Free-form comment.
    pub comment: String,
}

impl AssignmentInput {
    /// Business rules: non-negative hours, matching breakdown, Monday week start.
    pub fn check(&self) -> AppResult<()> {
        if self.hours < 0.0 || !self.hours.is_finite() {
            return Err(AppError::validation("Hours cannot be negative."));
        }
        for part in [self.scio_hours, self.external_hours].into_iter().flatten() {
            if part < 0.0 || !part.is_finite() {
                return Err(AppError::validation("Hours breakdown cannot be negative."));
            }
        }
        if let (Some(scio), Some(external)) = (self.scio_hours, self.external_hours) {
            let sum = scio + external;
            if (sum - self.hours).abs() > BREAKDOWN_TOLERANCE {
                return Err(AppError::validation(format!(
                    "scio_hours ({scio}) + external_hours ({external}) must equal hours ({})",
                    self.hours
                )));
            }
        }
        if self.week_start_date.weekday() != Weekday::Mon {
            return Err(AppError::validation(
                "week_start_date must be a Monday.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(hours: f64, scio: Option<f64>, external: Option<f64>, week: &str) -> AssignmentInput {
        AssignmentInput {
            employee_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            week_start_date: week.parse().unwrap(),
            hours,
            scio_hours: scio,
            external_hours: external,
            stage: Some(Stage::Concept),
            comment: String::new(),
        }
    }

    #[test]
    fn test_breakdown_must_sum() {
        assert!(input(40.0, Some(30.0), Some(10.0), "2025-03-03").check().is_ok());
        assert!(input(40.0, Some(30.0), Some(5.0), "2025-03-03").check().is_err());
        assert!(input(40.0, Some(30.0), None, "2025-03-03").check().is_ok());
    }

    #[test]
    fn test_week_must_start_on_monday() {
        assert!(input(8.0, None, None, "2025-03-04").check().is_err());
    }

    #[test]
    fn test_negative_hours_rejected() {
        assert!(input(-1.0, None, None, "2025-03-03").check().is_err());
        assert!(input(8.0, Some(-2.0), None, "2025-03-03").check().is_err());
    }
}
