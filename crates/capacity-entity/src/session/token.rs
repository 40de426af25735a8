//! Token value types returned on login and refresh.

use serde::{Deserialize, Serialize};

/// A pair of access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access JWT.
    pub access: String,
    /// The refresh JWT.
    pub refresh: String,
    /// Access token TTL in seconds.
    pub access_expires_in: u64,
}
