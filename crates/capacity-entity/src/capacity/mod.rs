//! Weekly capacity and occupancy rows.

pub mod model;

pub use model::{
    DepartmentWeeklyTotal, PrgExternalTeamCapacity, ScioTeamCapacity, SubcontractedTeamCapacity,
};
