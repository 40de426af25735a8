//! Request context carrying the authenticated principal and its resolved tier.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use capacity_auth::{AccessTier, Principal, has_user_management_access, resolve_access};
use capacity_core::{AppError, AppResult};

/// Context for the current authenticated request.
///
/// Built by the API layer after the session check, then passed into every
/// service call so that each operation knows who is acting and with which tier.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The session the access token belongs to, if it carries one.
    pub session_id: Option<Uuid>,
    /// Identity attributes used for authorization.
    pub principal: Principal,
    /// Tier resolved from the principal once per request.
    pub tier: AccessTier,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context, resolving the principal's tier.
    pub fn new(
        principal: Principal,
        session_id: Option<Uuid>,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        let tier = resolve_access(&principal);
        Self {
            user_id: principal.user_id,
            session_id,
            principal,
            tier,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// The username, for log fields.
    pub fn username(&self) -> &str {
        &self.principal.username
    }

    /// Whether the principal may administer registered users.
    pub fn can_manage_users(&self) -> bool {
        has_user_management_access(&self.principal)
    }

    /// Fails with `Forbidden` unless the principal may administer registered users.
    pub fn require_user_management(&self) -> AppResult<()> {
        if self.can_manage_users() {
            return Ok(());
        }
        Err(AppError::forbidden(
            "Only business intelligence staff can manage registered users.",
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_context {
    use super::*;
    use capacity_entity::department::{OtherDepartment, UserDepartment};

    /// A context for a principal with the given profile department.
    pub fn context(department: Option<UserDepartment>, other: Option<OtherDepartment>) -> RequestContext {
        let principal = Principal {
            user_id: Uuid::new_v4(),
            username: "planner@example.com".to_string(),
            is_superuser: false,
            is_staff: false,
            department,
            other_department: other,
            employee_department: None,
        };
        RequestContext::new(principal, Some(Uuid::new_v4()), "127.0.0.1".to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::test_context::context;
    use capacity_entity::department::{Department, OtherDepartment, UserDepartment};

    #[test]
    fn test_tier_is_resolved_on_construction() {
        let ctx = context(Some(UserDepartment::Mfg), None);
        assert_eq!(ctx.tier.scoped_department(), Some(Department::Mfg));
        assert!(!ctx.can_manage_users());
        assert!(ctx.require_user_management().is_err());
    }

    #[test]
    fn test_business_intelligence_manages_users() {
        let ctx = context(
            Some(UserDepartment::Other),
            Some(OtherDepartment::BusinessIntelligence),
        );
        assert!(ctx.tier.is_full_access());
        assert!(ctx.require_user_management().is_ok());
    }
}
