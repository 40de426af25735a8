//! Session registry: device cap, inactivity sweep, activity tracking, logout.

pub mod directory;
pub mod limits;
pub mod memory;
pub mod postgres;
pub mod registry;
pub mod store;

pub use directory::{MemoryUserDirectory, PgUserDirectory, UserDirectory};
pub use limits::SessionLimits;
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
pub use registry::{LoginOutcome, SessionRegistry, SessionStatus};
pub use store::{Admission, SessionStore};
