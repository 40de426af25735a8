//! Engineering department codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of departments that own employees, budgets and stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "department", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Department {
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
}

impl Department {
    /// Every department, in display order.
    pub const ALL: [Department; 6] = [
        Self::Pm,
        Self::Med,
        Self::Hd,
        Self::Mfg,
        Self::Build,
        Self::Prg,
    ];

    /// Return the department code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pm => "PM",
            Self::Med => "MED",
            Self::Hd => "HD",
            Self::Mfg => "MFG",
            Self::Build => "BUILD",
            Self::Prg => "PRG",
        }
    }

    /// Human-readable department name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pm => "Project Manager",
            Self::Med => "Mechanical Design",
            Self::Hd => "Hardware Design",
            Self::Mfg => "Manufacturing",
            Self::Build => "Assembly",
            Self::Prg => "Programming PLC",
        }
    }

    /// BUILD and MFG edit each other's data.
    pub fn in_shared_editing_group(&self) -> bool {
        matches!(self, Self::Build | Self::Mfg)
    }

    /// Lenient parse: trims and upper-cases, `None` for unknown codes.
    pub fn parse_code(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "PM" => Some(Self::Pm),
            "MED" => Some(Self::Med),
            "HD" => Some(Self::Hd),
            "MFG" => Some(Self::Mfg),
            "BUILD" => Some(Self::Build),
            "PRG" => Some(Self::Prg),
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Department {
    type Err = capacity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_code(s).ok_or_else(|| {
            capacity_core::AppError::validation(format!(
                "Invalid department: '{s}'. Expected one of: PM, MED, HD, MFG, BUILD, PRG"
            ))
        })
    }
}
