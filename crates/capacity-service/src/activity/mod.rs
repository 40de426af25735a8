//! Activity log.

pub mod service;

pub use service::{ActivityLogService, NewActivity};
