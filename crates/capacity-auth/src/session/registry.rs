//! The session registry.
//!
//! State per session: `Active -> Inactive` via the inactivity sweep, logout,
//! or a password change/reset. Inactive is terminal; logging in again always
//! creates a new row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use capacity_core::{AppError, AppResult};
use capacity_entity::session::{CreateSession, DeviceInfo, TokenPair, UserSession};
use capacity_entity::user::User;

use crate::jwt::{JwtDecoder, JwtEncoder, peek_claims, refresh_token_digest};
use crate::password::PasswordHasher;

use super::directory::UserDirectory;
use super::limits::SessionLimits;
use super::store::{Admission, SessionStore};

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";
const AT_CAPACITY: &str =
    "Maximum number of connected devices reached. Please log out of another device.";

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The new session.
    pub session: UserSession,
    /// Credentials bound to it.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

/// Answer of a session status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The session is usable.
    Active,
    /// The session was swept, logged out, or never existed.
    Inactive,
}

/// Owns every session state transition.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: PasswordHasher,
    limits: SessionLimits,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("limits", &self.limits)
            .finish()
    }
}

impl SessionRegistry {
    /// Creates a registry over the given back ends.
    pub fn new(
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            store,
            directory,
            encoder,
            decoder,
            hasher: PasswordHasher::new(),
            limits,
        }
    }

    /// The limits this registry enforces.
    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The verifying decoder.
    pub fn decoder(&self) -> &JwtDecoder {
        &self.decoder
    }

    /// Verify credentials and open a session if the user is under the cap.
    ///
    /// At the cap nothing is created and no credential is issued.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device: DeviceInfo,
        now: DateTime<Utc>,
    ) -> AppResult<LoginOutcome> {
        let user = self
            .directory
            .find_by_username(username.trim())
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        let valid = self
            .hasher
            .verify_password(password, &user.password_hash)
            .unwrap_or_else(|e| {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                false
            });
        if !valid {
            debug!(user_id = %user.id, "Login rejected: bad password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let session_id = Uuid::new_v4();
        let tokens = self.encoder.issue_pair(&user, session_id, now)?;
        let data = CreateSession {
            id: session_id,
            user_id: user.id,
            refresh_token_hash: refresh_token_digest(&tokens.refresh),
            device_info: device,
        };

        let session = match self
            .store
            .create_within_limit(&data, self.limits.max_active_sessions, now)
            .await?
        {
            Admission::Admitted(session) => session,
            Admission::AtCapacity => {
                warn!(
                    user_id = %user.id,
                    max_active = self.limits.max_active_sessions,
                    "Login rejected: session cap reached"
                );
                return Err(AppError::too_many_sessions(AT_CAPACITY));
            }
        };

        if let Err(e) = self.directory.record_login(user.id, now).await {
            warn!(user_id = %user.id, error = %e, "Failed to record last login");
        }

        info!(user_id = %user.id, session_id = %session.id, "Login successful");

        Ok(LoginOutcome {
            session,
            tokens,
            user,
        })
    }

    /// Deactivate every session idle past the configured timeout.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.sweep_with(self.limits, now).await
    }

    /// Sweep with an explicit timeout, floor still applied.
    pub async fn sweep_older_than(&self, minutes: u64, now: DateTime<Utc>) -> AppResult<u64> {
        self.sweep_with(self.limits.with_timeout_minutes(minutes), now)
            .await
    }

    async fn sweep_with(&self, limits: SessionLimits, now: DateTime<Utc>) -> AppResult<u64> {
        let swept = self.store.deactivate_idle(limits.cutoff(now)).await?;
        if swept > 0 {
            info!(
                swept,
                timeout_minutes = limits.inactivity_timeout.num_minutes(),
                "Deactivated idle sessions"
            );
        }
        Ok(swept)
    }

    /// Best-effort activity tracking for one request.
    ///
    /// Sweeps first, then touches the session named by the bearer token, or
    /// the user's latest session for tokens without a session claim. The token
    /// is read without verification and failures are only logged.
    pub async fn track_activity(&self, bearer: Option<&str>, now: DateTime<Utc>) {
        if let Err(e) = self.sweep(now).await {
            warn!(error = %e, "Inactivity sweep failed during activity tracking");
        }

        let Some(claims) = bearer.and_then(peek_claims) else {
            return;
        };

        let touched = match claims.session_id {
            Some(session_id) => self.store.touch(session_id, claims.sub, now).await,
            None => self.store.touch_latest(claims.sub, now).await,
        };
        if let Err(e) = touched {
            warn!(user_id = %claims.sub, error = %e, "Failed to record session activity");
        }
    }

    /// Sweep, then report whether the caller's session is still active.
    ///
    /// Tokens without a session claim fall back to "any active session".
    pub async fn check_status(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<SessionStatus> {
        self.sweep(now).await?;
        Ok(if self.is_session_active(user_id, session_id).await? {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        })
    }

    /// Whether the session is active and owned by `user_id`. No sweep.
    pub async fn is_session_active(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
    ) -> AppResult<bool> {
        match session_id {
            Some(id) => Ok(self
                .store
                .find_by_id(id)
                .await?
                .is_some_and(|s| s.is_active && s.user_id == user_id)),
            None => Ok(self.store.count_active(Some(user_id)).await? > 0),
        }
    }

    /// Deactivate the caller's own session.
    ///
    /// Prefers the session claim, then the refresh token; with neither, every
    /// session of the user is closed. Returns how many sessions were closed.
    pub async fn logout(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        refresh_token: Option<&str>,
    ) -> AppResult<u64> {
        let closed = match (session_id, refresh_token.filter(|t| !t.is_empty())) {
            (Some(id), _) => u64::from(self.store.deactivate(id, user_id).await?),
            (None, Some(refresh)) => u64::from(
                self.store
                    .deactivate_by_refresh_hash(&refresh_token_digest(refresh), user_id)
                    .await?,
            ),
            (None, None) => self.store.deactivate_all(user_id).await?,
        };
        info!(user_id = %user_id, session_id = ?session_id, closed, "Logout completed");
        Ok(closed)
    }

    /// Close every session of a user.
    pub async fn invalidate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let closed = self.store.deactivate_all(user_id).await?;
        info!(user_id = %user_id, closed, "Invalidated all sessions");
        Ok(closed)
    }

    /// Exchange a refresh token for a new pair on the same session.
    ///
    /// The session must be active, owned by the token's subject, and hold the
    /// token's digest. The stored digest is rotated.
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> AppResult<TokenPair> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let session_id = claims
            .session_id
            .ok_or_else(|| AppError::unauthorized("Refresh token is not bound to a session"))?;

        self.sweep(now).await?;

        let session = self
            .store
            .find_by_id(session_id)
            .await?
            .filter(|s| s.is_active && s.user_id == claims.sub)
            .ok_or_else(|| AppError::unauthorized("Session is no longer active"))?;

        if session.refresh_token_hash != refresh_token_digest(refresh_token) {
            warn!(user_id = %claims.sub, session_id = %session_id, "Stale refresh token presented");
            return Err(AppError::unauthorized("Refresh token has been rotated"));
        }

        let user = self
            .directory
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("User not found or inactive"))?;

        let tokens = self.encoder.issue_pair(&user, session_id, now)?;
        if !self
            .store
            .update_refresh_hash(session_id, &refresh_token_digest(&tokens.refresh))
            .await?
        {
            return Err(AppError::unauthorized("Session is no longer active"));
        }
        self.store.touch(session_id, user.id, now).await?;

        info!(user_id = %user.id, session_id = %session_id, "Token refreshed");
        Ok(tokens)
    }

    /// Active sessions, for one user or all.
    pub async fn list_active(&self, user_id: Option<Uuid>) -> AppResult<Vec<UserSession>> {
        self.store.list_active(user_id).await
    }

    /// Number of active sessions, for one user or all.
    pub async fn count_active(&self, user_id: Option<Uuid>) -> AppResult<u64> {
        self.store.count_active(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PASSWORD, TestAuth};
    use capacity_core::ErrorKind;
    use chrono::Duration;

    #[tokio::test]
    async fn test_login_is_case_insensitive_and_embeds_session() {
        let auth = TestAuth::new().await;
        let outcome = auth
            .registry
            .login("ANA.RUIZ", PASSWORD, DeviceInfo::default(), Utc::now())
            .await
            .unwrap();

        let claims = auth.registry.decoder().decode_access_token(&outcome.tokens.access).unwrap();
        assert_eq!(claims.session_id, Some(outcome.session.id));
        assert_eq!(claims.email, "ana.ruiz@example.com");
        assert!(outcome.session.is_active);
        assert_eq!(outcome.session.refresh_token_hash, refresh_token_digest(&outcome.tokens.refresh));

        let user = auth.directory.find_by_id(auth.user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let auth = TestAuth::new().await;
        let err = auth
            .registry
            .login("ana.ruiz", "wrong", DeviceInfo::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let err = auth
            .registry
            .login("nobody", PASSWORD, DeviceInfo::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(auth.store.count_active(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_third_login_rejected() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        for _ in 0..2 {
            auth.login(now).await;
        }
        let err = auth
            .registry
            .login("ana.ruiz", PASSWORD, DeviceInfo::default(), now)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManySessions);
        assert!(err.message.contains("log out of another device"));
        assert_eq!(auth.store.count_active(Some(auth.user.id)).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_never_exceed_cap() {
        let auth = TestAuth::new().await;
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let registry = auth.registry.clone();
            tasks.spawn(async move {
                registry
                    .login("ana.ruiz", PASSWORD, DeviceInfo::default(), Utc::now())
                    .await
            });
        }

        let mut admitted = 0;
        let mut rejected = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => admitted += 1,
                Err(e) => {
                    assert_eq!(e.kind, ErrorKind::TooManySessions);
                    rejected += 1;
                }
            }
        }
        assert_eq!(admitted, 2);
        assert_eq!(rejected, 6);
        assert_eq!(auth.store.count_active(Some(auth.user.id)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_logout_by_session_claim_is_isolated() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        let a = auth.login(now).await;
        let b = auth.login(now).await;

        let closed = auth.registry.logout(auth.user.id, Some(a.session.id), None).await.unwrap();
        assert_eq!(closed, 1);

        assert!(!auth.registry.is_session_active(auth.user.id, Some(a.session.id)).await.unwrap());
        assert!(auth.registry.is_session_active(auth.user.id, Some(b.session.id)).await.unwrap());

        // A third device fits again.
        auth.login(now).await;
    }

    #[tokio::test]
    async fn test_logout_falls_back_to_refresh_then_all() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        let a = auth.login(now).await;
        let b = auth.login(now).await;

        auth.registry.logout(auth.user.id, None, Some(&a.tokens.refresh)).await.unwrap();
        assert!(!auth.registry.is_session_active(auth.user.id, Some(a.session.id)).await.unwrap());
        assert!(auth.registry.is_session_active(auth.user.id, Some(b.session.id)).await.unwrap());

        auth.login(now).await;
        let closed = auth.registry.logout(auth.user.id, None, None).await.unwrap();
        assert_eq!(closed, 2);
        assert_eq!(auth.store.count_active(Some(auth.user.id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_logout_ignores_other_users_session() {
        let auth = TestAuth::new().await;
        let a = auth.login(Utc::now()).await;
        let closed = auth.registry.logout(Uuid::new_v4(), Some(a.session.id), None).await.unwrap();
        assert_eq!(closed, 0);
        assert!(auth.registry.is_session_active(auth.user.id, Some(a.session.id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_idle_session_reported_inactive_and_swept() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        let a = auth.login(now).await;
        let b = auth.login(now).await;
        auth.store.set_last_activity(a.session.id, now - Duration::minutes(21)).await;

        let status = auth.registry.check_status(auth.user.id, Some(a.session.id), now).await.unwrap();
        assert_eq!(status, SessionStatus::Inactive);
        let stored = auth.store.find_by_id(a.session.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let status = auth.registry.check_status(auth.user.id, Some(b.session.id), now).await.unwrap();
        assert_eq!(status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_legacy_status_falls_back_to_any_active() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        assert_eq!(
            auth.registry.check_status(auth.user.id, None, now).await.unwrap(),
            SessionStatus::Inactive
        );
        auth.login(now).await;
        assert_eq!(
            auth.registry.check_status(auth.user.id, None, now).await.unwrap(),
            SessionStatus::Active
        );
    }

    #[tokio::test]
    async fn test_track_activity_touches_claimed_session() {
        let auth = TestAuth::new().await;
        let start = Utc::now();
        let a = auth.login(start).await;
        let b = auth.login(start).await;

        let later = start + Duration::minutes(15);
        auth.registry.track_activity(Some(&a.tokens.access), later).await;

        let a_row = auth.store.find_by_id(a.session.id).await.unwrap().unwrap();
        let b_row = auth.store.find_by_id(b.session.id).await.unwrap().unwrap();
        assert_eq!(a_row.last_activity, later);
        assert_eq!(b_row.last_activity, start);

        // Untouched B goes stale; A survives.
        let much_later = start + Duration::minutes(25);
        auth.registry.track_activity(Some("garbage"), much_later).await;
        assert!(auth.store.find_by_id(a.session.id).await.unwrap().unwrap().is_active);
        assert!(!auth.store.find_by_id(b.session.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_track_activity_legacy_token_touches_latest() {
        let auth = TestAuth::new().await;
        let start = Utc::now();
        let a = auth.login(start).await;
        let b = auth.login(start + Duration::minutes(1)).await;

        let legacy = auth.legacy_access_token();
        let later = start + Duration::minutes(5);
        auth.registry.track_activity(Some(&legacy), later).await;

        assert_eq!(auth.store.find_by_id(b.session.id).await.unwrap().unwrap().last_activity, later);
        assert_eq!(auth.store.find_by_id(a.session.id).await.unwrap().unwrap().last_activity, start);
    }

    #[tokio::test]
    async fn test_refresh_rotates_digest() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        let a = auth.login(now).await;

        let rotated = auth.registry.refresh(&a.tokens.refresh, now + Duration::seconds(1)).await.unwrap();
        let claims = auth.registry.decoder().decode_access_token(&rotated.access).unwrap();
        assert_eq!(claims.session_id, Some(a.session.id));

        let err = auth.registry.refresh(&a.tokens.refresh, now).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(auth.registry.refresh(&rotated.refresh, now).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejected_after_logout() {
        let auth = TestAuth::new().await;
        let a = auth.login(Utc::now()).await;
        auth.registry.logout(auth.user.id, Some(a.session.id), None).await.unwrap();
        assert!(auth.registry.refresh(&a.tokens.refresh, Utc::now()).await.is_err());
        assert!(auth.registry.refresh(&a.tokens.access, Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_sweep_older_than_applies_floor() {
        let auth = TestAuth::new().await;
        let now = Utc::now();
        let a = auth.login(now).await;
        auth.store.set_last_activity(a.session.id, now - Duration::seconds(90)).await;
        assert_eq!(auth.registry.sweep_older_than(0, now).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_registry_uses_injected_limits() {
        let auth = TestAuth::with_limits(SessionLimits::new(1, 20)).await;
        auth.login(Utc::now()).await;
        let err = auth
            .registry
            .login("ana.ruiz", PASSWORD, DeviceInfo::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManySessions);
    }
}
