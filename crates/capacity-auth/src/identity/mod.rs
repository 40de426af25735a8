//! Identity resolution: who is asking and what tier of access they hold.

pub mod principal;
pub mod resolver;
pub mod tier;

pub use principal::Principal;
pub use resolver::{has_user_management_access, resolve_access};
pub use tier::AccessTier;
