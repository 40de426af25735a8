//! Employee entities.

pub mod model;

pub use model::{Employee, EmployeeInput, MAX_WEEKLY_CAPACITY};
