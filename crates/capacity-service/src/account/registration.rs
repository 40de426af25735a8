//! Self-service registration.
//!
//! Email delivery is not part of this service, so new accounts are active
//! immediately. The configured email domain is the gate instead.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use capacity_auth::{PasswordHasher, PasswordValidator};
use capacity_core::config::{AuthConfig, RegistrationConfig};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{EmployeeRepository, UserRepository};
use capacity_entity::department::{OtherDepartment, UserDepartment};
use capacity_entity::user::{CreateUser, User};

/// Registration body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Login name; defaults to the email.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Chosen password.
    #[serde(default)]
    pub password: String,
    /// Must equal `password`.
    #[serde(default, alias = "password_confirm")]
    pub confirm_password: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Department code, or `OTHER`.
    #[serde(default)]
    pub department: String,
    /// Required when `department` is `OTHER`.
    #[serde(default)]
    pub other_department: Option<String>,
}

/// A request that passed every check that needs no storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRegistration {
    /// Login name.
    pub username: String,
    /// Lower-cased email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Profile department.
    pub department: UserDepartment,
    /// Sub-classification for `OTHER`.
    pub other_department: Option<OtherDepartment>,
}

/// Creates accounts from the public registration endpoint.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    users: Arc<UserRepository>,
    employees: Arc<EmployeeRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    config: RegistrationConfig,
}

impl RegistrationService {
    /// Creates a new registration service.
    pub fn new(
        users: Arc<UserRepository>,
        employees: Arc<EmployeeRepository>,
        auth: &AuthConfig,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            users,
            employees,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(auth),
            config,
        }
    }

    /// Registers and activates a new account.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        if !self.config.enabled {
            return Err(AppError::service_unavailable("Registration is disabled."));
        }
        let prepared = prepare(request, &self.config, &self.validator)?;

        if self
            .users
            .identity_taken(&prepared.username, &prepared.email)
            .await?
        {
            return Err(AppError::conflict("A user with this email already exists."));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: prepared.username.clone(),
                email: prepared.email.clone(),
                password_hash,
                first_name: prepared.first_name.clone(),
                last_name: prepared.last_name.clone(),
                department: Some(prepared.department),
                other_department: prepared.other_department,
            })
            .await?;

        let full_name = format!("{} {}", prepared.first_name, prepared.last_name);
        match self.employees.link_unclaimed_by_name(&full_name, user.id).await {
            Ok(true) => info!(user_id = %user.id, "Registered user linked to employee record"),
            Ok(false) => {}
            Err(e) => warn!(user_id = %user.id, error = %e, "Employee link failed"),
        }

        info!(
            user_id = %user.id,
            email = %user.email,
            department = %prepared.department,
            "User registered"
        );
        Ok(user)
    }
}

/// Check and normalize a registration request.
pub fn prepare(
    request: &RegisterRequest,
    config: &RegistrationConfig,
    validator: &PasswordValidator,
) -> AppResult<PreparedRegistration> {
    let email = request.email.trim().to_lowercase();
    let first_name = request.first_name.trim().to_string();
    let last_name = request.last_name.trim().to_string();
    if email.is_empty() || first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::validation(
            "Email, first name and last name are required.",
        ));
    }
    if !email.contains('@') {
        return Err(AppError::validation("Enter a valid email address."));
    }
    if !config.accepts_email(&email) {
        return Err(AppError::validation(format!(
            "Email must be from domain {}",
            config.email_domain.trim()
        )));
    }

    let department: UserDepartment = request.department.parse()?;
    let other_department = match department {
        UserDepartment::Other => {
            let raw = request
                .other_department
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::validation("Other department is required when department is OTHER.")
                })?;
            Some(raw.parse::<OtherDepartment>()?)
        }
        _ => None,
    };

    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.clone());

    if request.password != request.confirm_password {
        return Err(AppError::validation("Passwords do not match."));
    }
    validator.validate(
        &request.password,
        &[&username, &email, &first_name, &last_name],
    )?;

    Ok(PreparedRegistration {
        username,
        email,
        first_name,
        last_name,
        department,
        other_department,
    })
}
