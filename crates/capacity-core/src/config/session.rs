//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Lowest inactivity timeout the registry will honor, in minutes.
pub const MIN_INACTIVITY_TIMEOUT_MINUTES: u64 = 1;

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of simultaneously active sessions per user.
    #[serde(default = "default_max_active")]
    pub max_active_sessions: u32,
    /// Minutes without activity before a session is flagged inactive.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,
}

impl SessionConfig {
    /// Inactivity timeout with the one-minute floor applied.
    pub fn effective_timeout_minutes(&self) -> u64 {
        self.inactivity_timeout_minutes
            .max(MIN_INACTIVITY_TIMEOUT_MINUTES)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: default_max_active(),
            inactivity_timeout_minutes: default_inactivity_timeout(),
        }
    }
}

fn default_max_active() -> u32 {
    2
}

fn default_inactivity_timeout() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_floor() {
        let config = SessionConfig {
            max_active_sessions: 2,
            inactivity_timeout_minutes: 0,
        };
        assert_eq!(config.effective_timeout_minutes(), 1);
        assert_eq!(SessionConfig::default().effective_timeout_minutes(), 20);
    }
}
