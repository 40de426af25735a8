//! Account services: self-registration and registered-user administration.

pub mod registered;
pub mod registration;

pub use registered::{RegisteredUserService, UpdateRegisteredUser};
pub use registration::{RegisterRequest, RegistrationService};
