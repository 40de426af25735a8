//! Facility enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site where a project is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "facility", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Facility {
    /// Facility A.
    Al,
    /// Facility B.
    Mi,
    /// Facility C.
    Mx,
}

impl Facility {
    /// Return the facility code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Al => "AL",
            Self::Mi => "MI",
            Self::Mx => "MX",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Facility {
    type Err = capacity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AL" => Ok(Self::Al),
            "MI" => Ok(Self::Mi),
            "MX" => Ok(Self::Mx),
            _ => Err(capacity_core::AppError::validation(format!(
                "Invalid facility: '{s}'. Expected one of: AL, MI, MX"
            ))),
        }
    }
}
