//! Session-related entities.

pub mod model;
pub mod token;

pub use model::{CreateSession, DeviceInfo, UserSession};
pub use token::TokenPair;
