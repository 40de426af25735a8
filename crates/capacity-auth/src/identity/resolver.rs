//! Tier resolution over already-loaded principal attributes.

use capacity_entity::department::{Department, OtherDepartment, UserDepartment};

use super::principal::Principal;
use super::tier::AccessTier;

/// Departments whose employees a read-only classification may still edit.
///
/// Closed mapping: a classification missing here edits nothing.
fn employee_edit_carve_out(other: Option<OtherDepartment>) -> &'static [Department] {
    match other {
        Some(OtherDepartment::HeadEngineering) => &[Department::Med],
        _ => &[],
    }
}

/// Resolve the single access tier of a principal.
pub fn resolve_access(principal: &Principal) -> AccessTier {
    if principal.is_elevated() {
        return AccessTier::FullAccess;
    }

    match principal.affiliation() {
        (Some(UserDepartment::Pm), _) => AccessTier::FullAccess,
        (Some(UserDepartment::Other), Some(OtherDepartment::BusinessIntelligence)) => {
            AccessTier::BusinessIntelligence
        }
        (Some(UserDepartment::Other), other) => AccessTier::ReadOnly {
            employee_editable: employee_edit_carve_out(other),
        },
        (Some(dept), _) => match dept.as_department() {
            Some(dept) => AccessTier::DepartmentScoped(dept),
            None => AccessTier::ReadOnly {
                employee_editable: &[],
            },
        },
        // No affiliation at all: nothing is editable.
        (None, _) => AccessTier::ReadOnly {
            employee_editable: &[],
        },
    }
}

/// Registered-user management: superusers and Business Intelligence only.
///
/// The affiliation is checked directly, so a staff flag neither grants nor
/// hides it.
pub fn has_user_management_access(principal: &Principal) -> bool {
    principal.is_superuser
        || principal.affiliation()
            == (
                Some(UserDepartment::Other),
                Some(OtherDepartment::BusinessIntelligence),
            )
}
