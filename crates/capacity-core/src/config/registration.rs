//! Self-service registration configuration.

use serde::{Deserialize, Serialize};

/// Registration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Whether `POST /api/register/` accepts new accounts.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Required email suffix such as `@example.com`. Empty accepts any domain.
    #[serde(default)]
    pub email_domain: String,
}

impl RegistrationConfig {
    /// Whether the email satisfies the configured domain restriction.
    pub fn accepts_email(&self, email: &str) -> bool {
        let domain = self.email_domain.trim();
        if domain.is_empty() {
            return true;
        }
        email.trim().to_lowercase().ends_with(&domain.to_lowercase())
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email_domain: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_email() {
        let open = RegistrationConfig::default();
        assert!(open.accepts_email("someone@anywhere.io"));

        let restricted = RegistrationConfig {
            enabled: true,
            email_domain: "@corp.example".to_string(),
        };
        assert!(restricted.accepts_email("Jane.Doe@CORP.example"));
        assert!(!restricted.accepts_email("jane@gmail.com"));
    }
}
