//! Custom Axum extractors.

pub mod auth;
pub mod pagination;

pub use auth::{AuthUser, BearerClaims};
pub use pagination::ListParams;
