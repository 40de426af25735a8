//! # capacity-api
//!
//! HTTP API layer for the capacity planner built on Axum.
//!
//! Provides the REST endpoints, session activity tracking, request logging,
//! CORS, extractors, DTOs, and the mapping from domain errors to responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
