//! # capacity-core
//!
//! Core crate for the capacity planner. Contains the configuration schema,
//! pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
