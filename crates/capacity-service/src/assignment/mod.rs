//! Weekly assignments.

pub mod service;

pub use service::AssignmentService;
