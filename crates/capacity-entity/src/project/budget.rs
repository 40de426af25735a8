//! Project budget rows, one per project and department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::department::Department;

/// Hours budgeted for one department of a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectBudget {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Budgeted department.
    pub department: Department,
    /// Quoted hours.
    pub hours_allocated: f64,
    /// Hours already used.
    pub hours_utilized: f64,
    /// Hours still forecast.
    pub hours_forecast: f64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ProjectBudget {
    /// Utilized plus forecast as a percentage of allocated; 0 when nothing is allocated.
    pub fn utilization_percent(&self) -> f64 {
        if self.hours_allocated == 0.0 {
            return 0.0;
        }
        (self.hours_utilized + self.hours_forecast) / self.hours_allocated * 100.0
    }
}

/// Partial update of a budget's hour columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetHoursPatch {
    /// New allocated hours.
    pub hours_allocated: Option<f64>,
    /// New utilized hours.
    pub hours_utilized: Option<f64>,
    /// New forecast hours.
    pub hours_forecast: Option<f64>,
}

impl BudgetHoursPatch {
    /// All provided values must be non-negative.
    pub fn check(&self) -> capacity_core::AppResult<()> {
        let values = [self.hours_allocated, self.hours_utilized, self.hours_forecast];
        if values.iter().flatten().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(capacity_core::AppError::validation(
                "Budget hours must be non-negative numbers.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_percent() {
        let now = Utc::now();
        let mut budget = ProjectBudget {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            department: Department::Med,
            hours_allocated: 200.0,
            hours_utilized: 50.0,
            hours_forecast: 50.0,
            created_at: now,
            updated_at: now,
        };
        assert!((budget.utilization_percent() - 50.0).abs() < f64::EPSILON);
        budget.hours_allocated = 0.0;
        assert_eq!(budget.utilization_percent(), 0.0);
    }

    #[test]
    fn test_patch_rejects_negative() {
        let patch = BudgetHoursPatch {
            hours_forecast: Some(-1.0),
            ..Default::default()
        };
        assert!(patch.check().is_err());
        assert!(BudgetHoursPatch::default().check().is_ok());
    }
}
