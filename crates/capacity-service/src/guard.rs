//! Write checks shared by the department-owned entity services.

use capacity_auth::AccessTier;
use capacity_auth::policy::{WriteTarget, authorize_entity_write};
use capacity_core::AppResult;
use capacity_entity::department::Department;

/// Authorize moving a row from `old` to `new` department ownership.
///
/// Creation passes `old = None`; deletion passes `new = None`. Both ends
/// must be editable, so a row can neither leave nor enter a foreign department.
pub fn authorize_transition(
    tier: &AccessTier,
    target: WriteTarget,
    old: Option<Department>,
    new: Option<Department>,
) -> AppResult<()> {
    if let Some(old) = old {
        authorize_entity_write(tier, target, old)?;
    }
    match new {
        Some(new) if Some(new) != old => authorize_entity_write(tier, target, new),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capacity_core::ErrorKind;

    #[test]
    fn test_scoped_transition_needs_both_ends() {
        let tier = AccessTier::DepartmentScoped(Department::Med);
        let target = WriteTarget::Employee;

        assert!(authorize_transition(&tier, target, None, Some(Department::Med)).is_ok());
        assert!(authorize_transition(&tier, target, Some(Department::Med), None).is_ok());

        let leaving = authorize_transition(&tier, target, Some(Department::Med), Some(Department::Hd));
        assert_eq!(leaving.unwrap_err().kind, ErrorKind::Forbidden);
        let entering = authorize_transition(&tier, target, Some(Department::Hd), Some(Department::Med));
        assert_eq!(entering.unwrap_err().kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_shared_group_transition() {
        let tier = AccessTier::DepartmentScoped(Department::Build);
        let moved = authorize_transition(
            &tier,
            WriteTarget::Assignment,
            Some(Department::Mfg),
            Some(Department::Build),
        );
        assert!(moved.is_ok());
    }

    #[test]
    fn test_read_only_carve_out_is_employee_only() {
        let tier = AccessTier::ReadOnly {
            employee_editable: &[Department::Med],
        };
        assert!(
            authorize_transition(&tier, WriteTarget::Employee, None, Some(Department::Med)).is_ok()
        );
        assert!(
            authorize_transition(&tier, WriteTarget::Assignment, None, Some(Department::Med))
                .is_err()
        );
    }
}
