//! Session limits handed to the registry at construction.

use chrono::{DateTime, Duration, Utc};

use capacity_core::config::SessionConfig;
use capacity_core::config::session::MIN_INACTIVITY_TIMEOUT_MINUTES;

/// Concurrency cap and inactivity timeout for the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Maximum simultaneously active sessions per user.
    pub max_active_sessions: u32,
    /// Idle time after which a session is swept.
    pub inactivity_timeout: Duration,
}

impl SessionLimits {
    /// Build limits, applying the one-minute timeout floor.
    pub fn new(max_active_sessions: u32, inactivity_timeout_minutes: u64) -> Self {
        let minutes = inactivity_timeout_minutes.max(MIN_INACTIVITY_TIMEOUT_MINUTES);
        Self {
            max_active_sessions,
            inactivity_timeout: Duration::minutes(minutes.min(i32::MAX as u64) as i64),
        }
    }

    /// Limits from the `[session]` configuration section.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.max_active_sessions, config.inactivity_timeout_minutes)
    }

    /// Same cap with a different timeout (floor still applied).
    pub fn with_timeout_minutes(self, minutes: u64) -> Self {
        Self::new(self.max_active_sessions, minutes)
    }

    /// Sessions idle since before this instant are stale at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.inactivity_timeout
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = SessionLimits::default();
        assert_eq!(limits.max_active_sessions, 2);
        assert_eq!(limits.inactivity_timeout, Duration::minutes(20));
    }

    #[test]
    fn test_timeout_floor() {
        let limits = SessionLimits::new(2, 0);
        assert_eq!(limits.inactivity_timeout, Duration::minutes(1));
        let now = Utc::now();
        assert_eq!(limits.cutoff(now), now - Duration::minutes(1));
    }
}
