//! Password change and administrative reset.
//!
//! Both end every session of the user; the next request from any device
//! must log in again with the new password.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use capacity_core::config::AuthConfig;
use capacity_core::{AppError, AppResult};
use capacity_entity::user::User;

use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::{SessionRegistry, UserDirectory};

/// Body of a self-service password change. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePassword {
    /// The password in use now.
    #[serde(default)]
    pub current_password: Option<String>,
    /// The replacement.
    #[serde(default)]
    pub new_password: Option<String>,
    /// Must equal `new_password`.
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// Password operations that invalidate sessions.
#[derive(Debug, Clone)]
pub struct AccountManager {
    directory: Arc<dyn UserDirectory>,
    sessions: SessionRegistry,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl AccountManager {
    /// Creates an account manager.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        sessions: SessionRegistry,
        config: &AuthConfig,
    ) -> Self {
        Self {
            directory,
            sessions,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        }
    }

    /// The policy used for new passwords.
    pub fn validator(&self) -> &PasswordValidator {
        &self.validator
    }

    /// Change the caller's own password. Returns the number of sessions closed.
    pub async fn change_password(&self, user_id: Uuid, request: &ChangePassword) -> AppResult<u64> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
        let (Some(current), Some(new), Some(confirm)) = (
            non_empty(&request.current_password),
            non_empty(&request.new_password),
            non_empty(&request.confirm_password),
        ) else {
            return Err(AppError::validation(
                "Please provide the current password, the new password and its confirmation.",
            ));
        };

        if new != confirm {
            return Err(AppError::validation("The new passwords do not match."));
        }
        self.validator.validate_not_same(&current, &new)?;

        let user = self.load(user_id).await?;
        if !self.hasher.verify_password(&current, &user.password_hash)? {
            return Err(AppError::unauthorized("The current password is incorrect."));
        }
        self.validator.validate_length(&new)?;

        self.store_password(&user, &new).await
    }

    /// Set a user's password on an administrator's behalf. The full policy applies.
    pub async fn reset_password(&self, user_id: Uuid, new_password: &str) -> AppResult<u64> {
        let user = self.load(user_id).await?;
        self.validator.validate(
            new_password,
            &[&user.username, &user.email, &user.first_name, &user.last_name],
        )?;
        self.store_password(&user, new_password).await
    }

    async fn load(&self, user_id: Uuid) -> AppResult<User> {
        self.directory
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    async fn store_password(&self, user: &User, password: &str) -> AppResult<u64> {
        let hash = self.hasher.hash_password(password)?;
        if !self.directory.set_password_hash(user.id, &hash).await? {
            return Err(AppError::not_found(format!("User {} not found", user.id)));
        }
        let closed = self.sessions.invalidate_all(user.id).await?;
        info!(user_id = %user.id, closed, "Password updated, sessions invalidated");
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::test_support::{PASSWORD, TestAuth};
    use capacity_core::ErrorKind;
    use capacity_entity::session::DeviceInfo;
    use chrono::Utc;

    const NEW_PASSWORD: &str = "Forklift!Meadow-Quartz-2031";

    fn manager(auth: &TestAuth) -> AccountManager {
        AccountManager::new(
            Arc::new(auth.directory.clone()),
            auth.registry.clone(),
            &AuthConfig::default(),
        )
    }

    fn change(current: &str, new: &str, confirm: &str) -> ChangePassword {
        ChangePassword {
            current_password: Some(current.to_string()),
            new_password: Some(new.to_string()),
            confirm_password: Some(confirm.to_string()),
        }
    }

    #[tokio::test]
    async fn test_change_password_invalidates_sessions() {
        let auth = TestAuth::new().await;
        let a = auth.login(Utc::now()).await;
        auth.login(Utc::now()).await;

        let closed = manager(&auth)
            .change_password(auth.user.id, &change(PASSWORD, NEW_PASSWORD, NEW_PASSWORD))
            .await
            .unwrap();
        assert_eq!(closed, 2);
        assert!(!auth.registry.is_session_active(auth.user.id, Some(a.session.id)).await.unwrap());

        let old = auth
            .registry
            .login("ana.ruiz", PASSWORD, DeviceInfo::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(old.kind, ErrorKind::Unauthorized);
        assert!(
            auth.registry
                .login("ana.ruiz", NEW_PASSWORD, DeviceInfo::default(), Utc::now())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_change_password_rules() {
        let auth = TestAuth::new().await;
        let manager = manager(&auth);
        let id = auth.user.id;

        let missing = ChangePassword {
            current_password: Some(PASSWORD.to_string()),
            ..Default::default()
        };
        assert_eq!(manager.change_password(id, &missing).await.unwrap_err().kind, ErrorKind::Validation);

        let mismatch = change(PASSWORD, NEW_PASSWORD, "different");
        assert_eq!(manager.change_password(id, &mismatch).await.unwrap_err().kind, ErrorKind::Validation);

        let same = change(PASSWORD, PASSWORD, PASSWORD);
        assert_eq!(manager.change_password(id, &same).await.unwrap_err().kind, ErrorKind::Validation);

        let wrong = change("not-it", NEW_PASSWORD, NEW_PASSWORD);
        assert_eq!(manager.change_password(id, &wrong).await.unwrap_err().kind, ErrorKind::Unauthorized);

        let short = change(PASSWORD, "short", "short");
        assert_eq!(manager.change_password(id, &short).await.unwrap_err().kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_reset_password_applies_policy_and_invalidates() {
        let auth = TestAuth::new().await;
        auth.login(Utc::now()).await;
        let manager = manager(&auth);

        let err = manager.reset_password(auth.user.id, "password").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(auth.store.count_active(Some(auth.user.id)).await.unwrap(), 1);

        assert_eq!(manager.reset_password(auth.user.id, NEW_PASSWORD).await.unwrap(), 1);
        assert!(
            auth.registry
                .login("ana.ruiz", NEW_PASSWORD, DeviceInfo::default(), Utc::now())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_reset_unknown_user() {
        let auth = TestAuth::new().await;
        let err = manager(&auth).reset_password(Uuid::new_v4(), NEW_PASSWORD).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
