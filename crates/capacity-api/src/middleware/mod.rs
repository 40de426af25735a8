//! Axum middleware stack.

pub mod activity;
pub mod compression;
pub mod cors;
pub mod logging;
