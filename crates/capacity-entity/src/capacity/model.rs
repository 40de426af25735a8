//! Capacity entity models. Each table is unique on its key and week.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::department::Department;

/// SCIO team capacity per department and week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScioTeamCapacity {
    /// Unique row identifier.
    pub id: Uuid,
    /// Department.
    pub department: Department,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Capacity in hours.
    pub capacity: f64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Subcontracted personnel per company and week (BUILD).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubcontractedTeamCapacity {
    /// Unique row identifier.
    pub id: Uuid,
    /// Company name.
    pub company: String,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Number of people.
    pub capacity: i32,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// External PRG team personnel per team and week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrgExternalTeamCapacity {
    /// Unique row identifier.
    pub id: Uuid,
    /// External team name.
    pub team_name: String,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Number of people.
    pub capacity: i32,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Occupancy hours per department and week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DepartmentWeeklyTotal {
    /// Unique row identifier.
    pub id: Uuid,
    /// Department.
    pub department: Department,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Assigned hours.
    pub total_hours: f64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}
