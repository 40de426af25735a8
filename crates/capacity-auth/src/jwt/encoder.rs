//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use capacity_core::config::AuthConfig;
use capacity_core::error::AppError;
use capacity_entity::session::TokenPair;
use capacity_entity::user::User;

use super::claims::{Claims, TokenType};

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in hours.
    refresh_ttl_hours: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
            refresh_ttl_hours: config.jwt_refresh_ttl_hours as i64,
        }
    }

    /// Issues an access + refresh pair bound to `session_id`.
    ///
    /// Both tokens carry the session claim and the user's public profile.
    pub fn issue_pair(
        &self,
        user: &User,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AppError> {
        let access_exp = now + Duration::minutes(self.access_ttl_minutes);
        let refresh_exp = now + Duration::hours(self.refresh_ttl_hours);

        let access = self.sign(&self.claims(user, session_id, now, access_exp, TokenType::Access))?;
        let refresh =
            self.sign(&self.claims(user, session_id, now, refresh_exp, TokenType::Refresh))?;

        Ok(TokenPair {
            access,
            refresh,
            access_expires_in: (self.access_ttl_minutes.max(0) as u64) * 60,
        })
    }

    fn claims(
        &self,
        user: &User,
        session_id: Uuid,
        now: DateTime<Utc>,
        exp: DateTime<Utc>,
        token_type: TokenType,
    ) -> Claims {
        Claims {
            sub: user.id,
            session_id: Some(session_id),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    /// Signs arbitrary claims. Used directly by tests that need legacy tokens.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}

/// SHA-256 hex digest of a refresh token, the only form that is stored.
pub fn refresh_token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let digest = refresh_token_digest("abc");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(digest, refresh_token_digest("abd"));
    }
}
