//! HTTP request handlers, one module per resource.

pub mod activity;
pub mod assignment;
pub mod auth;
pub mod budget;
pub mod capacity;
pub mod change_order;
pub mod employee;
pub mod health;
pub mod project;
pub mod register;
pub mod registered_user;
pub mod stage_config;
