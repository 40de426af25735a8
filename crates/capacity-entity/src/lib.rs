//! # capacity-entity
//!
//! Domain entity models for the capacity planner. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod activity;
pub mod assignment;
pub mod capacity;
pub mod department;
pub mod employee;
pub mod project;
pub mod session;
pub mod user;
