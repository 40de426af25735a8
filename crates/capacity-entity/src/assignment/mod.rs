//! Weekly hour assignments.

pub mod model;

pub use model::{Assignment, AssignmentInput};
