//! Sub-classification for users outside the engineering departments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of an `OTHER` department user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "other_department", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtherDepartment {
    /// Business Intelligence managers.
    BusinessIntelligence,
    /// Head of Engineering.
    HeadEngineering,
    /// Finance.
    Finance,
    /// Human Resources.
    HumanResources,
    /// Sales.
    Sales,
    /// Operations.
    Operations,
}

impl OtherDepartment {
    /// Return the code as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessIntelligence => "BUSINESS_INTELLIGENCE",
            Self::HeadEngineering => "HEAD_ENGINEERING",
            Self::Finance => "FINANCE",
            Self::HumanResources => "HUMAN_RESOURCES",
            Self::Sales => "SALES",
            Self::Operations => "OPERATIONS",
        }
    }
}

impl fmt::Display for OtherDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OtherDepartment {
    type Err = capacity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "BUSINESS_INTELLIGENCE" => Ok(Self::BusinessIntelligence),
            "HEAD_ENGINEERING" => Ok(Self::HeadEngineering),
            "FINANCE" => Ok(Self::Finance),
            "HUMAN_RESOURCES" => Ok(Self::HumanResources),
            "SALES" => Ok(Self::Sales),
            "OPERATIONS" => Ok(Self::Operations),
            _ => Err(capacity_core::AppError::validation(format!(
                "Invalid other department: '{s}'"
            ))),
        }
    }
}
