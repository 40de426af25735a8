//! Project entities: the project row and its per-department children.

pub mod budget;
pub mod change_order;
pub mod facility;
pub mod model;
pub mod stage;
pub mod stage_config;

pub use budget::{BudgetHoursPatch, ProjectBudget};
pub use change_order::{ChangeOrderInput, ProjectChangeOrder};
pub use facility::Facility;
pub use model::{MAX_PROJECT_WEEKS, Project, ProjectChildren, ProjectFields};
pub use stage::Stage;
pub use stage_config::{DepartmentStageConfig, NewStageConfig};
