//! Department affiliation recorded on a user profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::code::Department;

/// A user's department: one of the engineering departments or `OTHER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_department", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserDepartment {
    /// Project Manager.
    Pm,
    /// Mechanical Design.
    Med,
    /// Hardware Design.
    Hd,
    /// Manufacturing.
    Mfg,
    /// Assembly.
    Build,
    /// Programming PLC.
    Prg,
    /// Outside the engineering departments; see [`super::OtherDepartment`].
    Other,
}

impl UserDepartment {
    /// The engineering department, or `None` for `OTHER`.
    pub fn as_department(&self) -> Option<Department> {
        match self {
            Self::Pm => Some(Department::Pm),
            Self::Med => Some(Department::Med),
            Self::Hd => Some(Department::Hd),
            Self::Mfg => Some(Department::Mfg),
            Self::Build => Some(Department::Build),
            Self::Prg => Some(Department::Prg),
            Self::Other => None,
        }
    }

    /// Return the code as stored.
    pub fn as_str(&self) -> &'static str {
        match self.as_department() {
            Some(dept) => dept.as_str(),
            None => "OTHER",
        }
    }
}

impl From<Department> for UserDepartment {
    fn from(dept: Department) -> Self {
        match dept {
            Department::Pm => Self::Pm,
            Department::Med => Self::Med,
            Department::Hd => Self::Hd,
            Department::Mfg => Self::Mfg,
            Department::Build => Self::Build,
            Department::Prg => Self::Prg,
        }
    }
}

impl fmt::Display for UserDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserDepartment {
    type Err = capacity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("OTHER") {
            return Ok(Self::Other);
        }
        s.parse::<Department>().map(Self::from)
    }
}
