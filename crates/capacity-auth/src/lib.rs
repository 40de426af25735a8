//! # capacity-auth
//!
//! Authentication and authorization for the capacity planner.
//!
//! ## Modules
//!
//! - `identity`: resolve a principal into exactly one access tier
//! - `policy`: department edit rights and composite project payload checks
//! - `jwt`: token issuing, verified decoding, and the unverified activity peek
//! - `password`: Argon2id hashing and password policy
//! - `session`: the session registry: device cap, inactivity sweep, logout
//! - `account`: password change and administrative reset

pub mod account;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod session;

#[cfg(test)]
mod test_support;

pub use account::{AccountManager, ChangePassword};
pub use identity::{AccessTier, Principal, has_user_management_access, resolve_access};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{
    SessionLimits, SessionRegistry, SessionStatus, SessionStore, UserDirectory,
};
