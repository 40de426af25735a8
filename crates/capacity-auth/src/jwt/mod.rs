//! JWT token encoding, decoding, and claims management.
//!
//! Two trust levels are kept apart: [`JwtDecoder::decode_access_token`]
//! verifies and authorizes, [`peek_claims`] only reads claims for activity
//! tracking and must never authorize anything.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenType};
pub use decoder::{JwtDecoder, peek_claims};
pub use encoder::{JwtEncoder, refresh_token_digest};
