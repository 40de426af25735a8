//! Department access policy.
//!
//! Stateless decisions over a resolved [`AccessTier`](crate::identity::AccessTier).
//! Every denial is a single `Forbidden` error; nothing here touches storage.

pub mod department;
pub mod payload;
pub mod project;

pub use department::{
    WriteTarget, authorize_entity_write, authorize_hidden_data_access, can_edit_department,
    require_full_access,
};
pub use payload::ProjectPayload;
pub use project::{
    CurrentProjectState, authorize_project_create, authorize_project_update, payload_of,
};
