//! Per-department stage schedule rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::stage::Stage;
use crate::department::Department;

/// One scheduled stage of a department within a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DepartmentStageConfig {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Department whose schedule this is.
    pub department: Department,
    /// Stage, if named.
    pub stage: Option<Stage>,
    /// 1-based first project week.
    pub week_start: i32,
    /// 1-based last project week.
    pub week_end: i32,
    /// Actual start date for this department.
    pub department_start_date: Option<NaiveDate>,
    /// Duration in weeks.
    pub duration_weeks: Option<i32>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DepartmentStageConfig {
    /// Stored duration, or the inclusive week span.
    pub fn effective_duration_weeks(&self) -> i32 {
        self.duration_weeks
            .unwrap_or(self.week_end - self.week_start + 1)
    }
}

/// A stage row to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStageConfig {
    /// Department whose schedule this is.
    pub department: Department,
    /// Stage, if named.
    pub stage: Option<Stage>,
    /// 1-based first week.
    pub week_start: i32,
    /// 1-based last week.
    pub week_end: i32,
    /// Actual department start date.
    pub department_start_date: Option<NaiveDate>,
    /// Duration in weeks.
    pub duration_weeks: Option<i32>,
}

impl NewStageConfig {
    /// Check week bounds.
    pub fn check(&self) -> capacity_core::AppResult<()> {
        if self.week_start < 1 || self.week_end < self.week_start {
            return Err(capacity_core::AppError::validation(format!(
                "Invalid stage weeks for {}: {}..{}",
                self.department, self.week_start, self.week_end
            )));
        }
        if matches!(self.duration_weeks, Some(d) if d < 1) {
            return Err(capacity_core::AppError::validation(
                "Stage duration must be at least 1 week.",
            ));
        }
        Ok(())
    }
}
