//! Weekly capacity tables.

pub mod service;
pub mod table;

pub use service::{
    PrgExternalCapacityService, ScioCapacityService, SubcontractedCapacityService,
    WeeklyCapacityService, WeeklyTotalService,
};
pub use table::WeeklyTable;
