//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use capacity_database::repositories::{AssignmentFilter, EmployeeFilter, ProjectFilter};
use capacity_entity::department::Department;
use capacity_entity::project::{BudgetHoursPatch, NewStageConfig};
use capacity_service::parse_bool_flag;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh: String,
}

/// Optional logout body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token of the session to close.
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Administrative password reset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Replacement password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
    /// Must equal `new_password` when present.
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// Body for creating or replacing a project budget row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    /// Owning project.
    pub project_id: Uuid,
    /// Department the hours belong to.
    pub department: Department,
    /// Hours to set.
    #[serde(flatten)]
    pub hours: BudgetHoursPatch,
}

/// Body of `PATCH /api/project-budgets/update_budget_hours/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetHoursRequest {
    /// Owning project.
    pub project_id: Uuid,
    /// Department the hours belong to.
    pub department: Department,
    /// Hours to change; absent fields are kept.
    #[serde(flatten)]
    pub hours: BudgetHoursPatch,
}

/// Body for creating or replacing a department stage row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfigRequest {
    /// Owning project.
    pub project_id: Uuid,
    /// Stage row.
    #[serde(flatten)]
    pub config: NewStageConfig,
}

/// Employee list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Department code.
    pub department: Option<Department>,
    /// `is_active` flag, any boolean-like spelling.
    pub is_active: Option<String>,
    /// Substring of the name.
    pub search: Option<String>,
}

impl EmployeeQuery {
    /// Repository filter.
    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            department: self.department,
            is_active: self
                .is_active
                .as_deref()
                .map(|v| parse_bool_flag(Some(v), true)),
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Project list and retrieve filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectQuery {
    /// Include soft-deleted projects (full access only).
    pub include_hidden: Option<String>,
    /// Facility code.
    pub facility: Option<String>,
    /// Starting on or after.
    pub start_from: Option<NaiveDate>,
    /// Ending on or before.
    pub end_until: Option<NaiveDate>,
    /// Substring of name or client.
    pub search: Option<String>,
}

impl ProjectQuery {
    /// Whether hidden projects were asked for.
    pub fn include_hidden(&self) -> bool {
        parse_bool_flag(self.include_hidden.as_deref(), false)
    }
}

/// Assignment list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentQuery {
    /// Include assignments on hidden projects (full access only).
    pub include_hidden: Option<String>,
    /// Restrict to one employee.
    pub employee_id: Option<Uuid>,
    /// Restrict to one project.
    pub project_id: Option<Uuid>,
    /// Weeks on or after.
    pub week_from: Option<NaiveDate>,
    /// Weeks on or before.
    pub week_until: Option<NaiveDate>,
}

impl AssignmentQuery {
    /// Repository filter.
    pub fn filter(&self) -> AssignmentFilter {
        AssignmentFilter {
            include_hidden: parse_bool_flag(self.include_hidden.as_deref(), false),
            employee_id: self.employee_id,
            project_id: self.project_id,
            week_from: self.week_from,
            week_until: self.week_until,
        }
    }
}

/// Filters on per-project, per-department child rows.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProjectChildQuery {
    /// Restrict to one project.
    pub project: Option<Uuid>,
    /// Restrict to one department.
    pub department: Option<Department>,
}

/// Activity log filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    /// Acting user.
    pub user: Option<Uuid>,
    /// Model name.
    pub model_name: Option<String>,
}

/// Week range shared by the capacity tables.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WeekRange {
    /// Weeks on or after.
    pub week_from: Option<NaiveDate>,
    /// Weeks on or before.
    pub week_until: Option<NaiveDate>,
}

/// Filters for department-keyed capacity tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentWeekQuery {
    /// Department code.
    pub department: Option<Department>,
    /// Week range.
    #[serde(flatten)]
    pub weeks: WeekRange,
}

/// Filters for the subcontracted capacity table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyWeekQuery {
    /// Company name.
    pub company: Option<String>,
    /// Week range.
    #[serde(flatten)]
    pub weeks: WeekRange,
}

/// Filters for the external PRG capacity table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamWeekQuery {
    /// Team name.
    pub team_name: Option<String>,
    /// Week range.
    #[serde(flatten)]
    pub weeks: WeekRange,
}

/// SCIO capacity row body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScioCapacityRequest {
    /// Department.
    pub department: Department,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Hours available.
    pub capacity: f64,
}

/// Subcontracted capacity row body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcontractedCapacityRequest {
    /// Company name.
    pub company: String,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Headcount.
    pub capacity: i32,
}

/// External PRG capacity row body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrgExternalCapacityRequest {
    /// Team name.
    pub team_name: String,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Headcount.
    pub capacity: i32,
}

/// Department weekly total row body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTotalRequest {
    /// Department.
    pub department: Department,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Occupied hours.
    pub total_hours: f64,
}
