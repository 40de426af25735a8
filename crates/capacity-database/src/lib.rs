//! # capacity-database
//!
//! PostgreSQL connection management, embedded migrations, and concrete
//! repositories for every capacity planner table.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
