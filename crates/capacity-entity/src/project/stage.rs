//! Work stage enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A work stage used by stage configurations and assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stage", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    SwitchLayoutRevision,
    ControlsDesign,
    Concept,
    DetailDesign,
    CabinetsFrames,
    OverallAssembly,
    FineTuning,
    Commissioning,
    Offline,
    Online,
    Debug,
    Release,
    RedLines,
    Support,
    SupportManualsFlowCharts,
    RobotSimulation,
    StandardsRevProgramingConcept,
}

impl Stage {
    /// Every stage, in declaration order.
    pub const ALL: [Stage; 17] = [
        Self::SwitchLayoutRevision,
        Self::ControlsDesign,
        Self::Concept,
        Self::DetailDesign,
        Self::CabinetsFrames,
        Self::OverallAssembly,
        Self::FineTuning,
        Self::Commissioning,
        Self::Offline,
        Self::Online,
        Self::Debug,
        Self::Release,
        Self::RedLines,
        Self::Support,
        Self::SupportManualsFlowCharts,
        Self::RobotSimulation,
        Self::StandardsRevProgramingConcept,
    ];

    /// Return the stage code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SwitchLayoutRevision => "SWITCH_LAYOUT_REVISION",
            Self::ControlsDesign => "CONTROLS_DESIGN",
            Self::Concept => "CONCEPT",
            Self::DetailDesign => "DETAIL_DESIGN",
            Self::CabinetsFrames => "CABINETS_FRAMES",
            Self::OverallAssembly => "OVERALL_ASSEMBLY",
            Self::FineTuning => "FINE_TUNING",
            Self::Commissioning => "COMMISSIONING",
            Self::Offline => "OFFLINE",
            Self::Online => "ONLINE",
            Self::Debug => "DEBUG",
            Self::Release => "RELEASE",
            Self::RedLines => "RED_LINES",
            Self::Support => "SUPPORT",
            Self::SupportManualsFlowCharts => "SUPPORT_MANUALS_FLOW_CHARTS",
            Self::RobotSimulation => "ROBOT_SIMULATION",
            Self::StandardsRevProgramingConcept => "STANDARDS_REV_PROGRAMING_CONCEPT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = capacity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == code)
            .ok_or_else(|| capacity_core::AppError::validation(format!("Invalid stage: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
        assert!("painting".parse::<Stage>().is_err());
    }
}
