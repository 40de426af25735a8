//! Password policy enforcement for new passwords.

use capacity_core::config::AuthConfig;
use capacity_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length as usize,
        }
    }

    /// Minimum length only. Password changes enforce just this.
    pub fn validate_length(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Full policy: length, character classes, and zxcvbn strength.
    ///
    /// `user_inputs` (username, email, names) are penalized by the strength check.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        self.validate_length(password)?;

        let mut missing = Vec::new();
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            missing.push("at least one uppercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            missing.push("at least one lowercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            missing.push("at least one number");
        }
        if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
            missing.push("at least one special character");
        }
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Password must include {}.",
                missing.join(", ")
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_length() {
        assert!(validator().validate_length("short").is_err());
        assert!(validator().validate_length("longenough").is_ok());
    }

    #[test]
    fn test_lists_every_missing_rule() {
        let err = validator().validate("alllowercase", &[]).unwrap_err();
        assert_eq!(
            err.message,
            "Password must include at least one uppercase letter, at least one number, at least one special character."
        );
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(validator().validate("Password1!", &[]).is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(validator().validate("Gantt#Ridge-Walrus-1987", &["ana"]).is_ok());
    }

    #[test]
    fn test_not_same() {
        assert!(validator().validate_not_same("A", "A").is_err());
        assert!(validator().validate_not_same("A", "B").is_ok());
    }
}
