//! Repository implementations for all capacity planner tables.

pub mod activity;
pub mod assignment;
pub mod budget;
pub mod capacity;
pub mod change_order;
pub mod employee;
pub mod project;
pub mod session;
pub mod stage_config;
pub mod user;

pub use activity::ActivityLogRepository;
pub use assignment::{AssignmentFilter, AssignmentRepository};
pub use budget::BudgetRepository;
pub use capacity::{
    PrgExternalCapacityRepository, ScioCapacityRepository, SubcontractedCapacityRepository,
    WeeklyTotalRepository,
};
pub use change_order::ChangeOrderRepository;
pub use employee::{EmployeeFilter, EmployeeRepository};
pub use project::{LockedProject, ProjectFilter, ProjectRepository, ProjectWrite};
pub use session::SessionRepository;
pub use stage_config::StageConfigRepository;
pub use user::UserRepository;

use capacity_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error, surfacing unique violations as `Conflict`.
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
