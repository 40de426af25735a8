//! Projects and their per-department children.

pub mod budget;
pub mod change_order;
pub mod fields;
pub mod service;
pub mod stage_config;

pub use budget::BudgetService;
pub use change_order::ChangeOrderService;
pub use service::ProjectService;
pub use stage_config::StageConfigService;
