//! Administration of self-registered accounts.
//!
//! Only superusers and business intelligence staff get here. Staff and
//! superuser accounts are outside this view: they are neither listed nor editable.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use capacity_auth::{AccountManager, SessionRegistry};
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::UserRepository;
use capacity_entity::department::{OtherDepartment, UserDepartment};
use capacity_entity::user::{UpdateUserProfile, User};

use crate::context::RequestContext;

/// Profile changes an administrator may make.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRegisteredUser {
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Activate or deactivate the account.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New profile department.
    #[serde(default)]
    pub department: Option<UserDepartment>,
    /// New sub-classification; kept only for `OTHER`.
    #[serde(default)]
    pub other_department: Option<OtherDepartment>,
}

/// Registered-user administration.
#[derive(Debug, Clone)]
pub struct RegisteredUserService {
    users: Arc<UserRepository>,
    accounts: AccountManager,
    sessions: SessionRegistry,
}

impl RegisteredUserService {
    /// Creates a new registered-user service.
    pub fn new(users: Arc<UserRepository>, accounts: AccountManager, sessions: SessionRegistry) -> Self {
        Self {
            users,
            accounts,
            sessions,
        }
    }

    /// Registered users, newest first.
    pub async fn list(&self, ctx: &RequestContext, page: &PageRequest) -> AppResult<PageResponse<User>> {
        ctx.require_user_management()?;
        self.users.find_registered(page).await
    }

    /// One registered user.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<User> {
        ctx.require_user_management()?;
        self.load(id).await
    }

    /// Update profile fields, department or the active flag.
    ///
    /// Deactivating an account also ends its sessions.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: &UpdateRegisteredUser,
    ) -> AppResult<User> {
        ctx.require_user_management()?;
        let current = self.load(id).await?;
        let update = check_update(&current, changes)?;

        if let Some(email) = &update.email {
            if let Some(other) = self.users.find_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::conflict("A user with this email already exists."));
                }
            }
        }

        let user = self.users.update_profile(id, &update).await?;
        if current.is_active && !user.is_active {
            let closed = self.sessions.invalidate_all(id).await?;
            info!(admin_id = %ctx.user_id, user_id = %id, closed, "Deactivated user signed out");
        }
        info!(admin_id = %ctx.user_id, user_id = %id, "Registered user updated");
        Ok(user)
    }

    /// Set a new password for a registered user and end their sessions.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        new_password: &str,
    ) -> AppResult<u64> {
        ctx.require_user_management()?;
        self.load(id).await?;
        let closed = self.accounts.reset_password(id, new_password).await?;
        info!(admin_id = %ctx.user_id, user_id = %id, closed, "Password reset by administrator");
        Ok(closed)
    }

    /// Delete a registered user. The caller's own account is refused.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_user_management()?;
        if id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot delete your own account from this view.",
            ));
        }
        let user = self.load(id).await?;

        self.sessions.invalidate_all(id).await?;
        if !self.users.delete(id).await? {
            return Err(not_found(id));
        }
        info!(admin_id = %ctx.user_id, user_id = %id, email = %user.email, "Registered user deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .filter(|u| !u.is_staff && !u.is_superuser)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("User {id} not found"))
}

/// Normalize an update against the stored user.
fn check_update(current: &User, changes: &UpdateRegisteredUser) -> AppResult<UpdateUserProfile> {
    let email = match changes.email.as_deref().map(str::trim) {
        Some("") => return Err(AppError::validation("Email cannot be blank.")),
        Some(email) if !email.contains('@') => {
            return Err(AppError::validation("Enter a valid email address."));
        }
        Some(email) => Some(email.to_lowercase()),
        None => None,
    };

    let department = changes.department.or(current.department);
    let other_department = match department {
        Some(UserDepartment::Other) => {
            let other = changes.other_department.or(current.other_department);
            if other.is_none() {
                return Err(AppError::validation(
                    "Other department is required when department is OTHER.",
                ));
            }
            other
        }
        _ => None,
    };

    let trimmed = |v: &Option<String>| v.as_deref().map(str::trim).map(str::to_string);
    Ok(UpdateUserProfile {
        email,
        first_name: trimmed(&changes.first_name),
        last_name: trimmed(&changes.last_name),
        is_active: changes.is_active,
        department: changes.department,
        other_department,
    })
}
