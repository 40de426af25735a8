//! # capacity-service
//!
//! Business logic for the capacity planner. Every write resolves the caller's
//! access tier from the [`RequestContext`] and applies the department policy
//! before touching a repository.
//!
//! Services follow constructor injection: dependencies are provided at
//! construction time via `Arc` references.

pub mod account;
pub mod activity;
pub mod assignment;
pub mod capacity;
pub mod context;
pub mod employee;
pub mod guard;
pub mod project;
pub mod query;

#[cfg(test)]
mod test_support;

pub use account::{RegisterRequest, RegisteredUserService, RegistrationService, UpdateRegisteredUser};
pub use activity::{ActivityLogService, NewActivity};
pub use assignment::AssignmentService;
pub use capacity::{
    PrgExternalCapacityService, ScioCapacityService, SubcontractedCapacityService,
    WeeklyCapacityService, WeeklyTotalService,
};
pub use context::RequestContext;
pub use employee::EmployeeService;
pub use project::{BudgetService, ChangeOrderService, ProjectService, StageConfigService};
pub use query::parse_bool_flag;
