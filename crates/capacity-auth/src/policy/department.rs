//! Department-level edit rights.

use capacity_core::{AppError, AppResult};
use capacity_entity::department::Department;
use tracing::debug;

use crate::identity::AccessTier;

/// Kind of department-owned entity being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    /// An employee row, owned by the employee's department.
    Employee,
    /// An assignment, owned by the assigned employee's department.
    Assignment,
    /// A change order, owned by its department.
    ChangeOrder,
}

impl WriteTarget {
    fn label(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Assignment => "assignment",
            Self::ChangeOrder => "change order",
        }
    }
}

/// Whether the tier may edit data owned by `dept`.
///
/// BUILD and MFG form a shared group and edit each other's data.
pub fn can_edit_department(tier: &AccessTier, dept: Department) -> bool {
    match tier {
        AccessTier::FullAccess | AccessTier::BusinessIntelligence => true,
        AccessTier::ReadOnly { employee_editable } => employee_editable.contains(&dept),
        AccessTier::DepartmentScoped(own) => {
            *own == dept || (own.in_shared_editing_group() && dept.in_shared_editing_group())
        }
    }
}

/// Authorize a write to an entity owned by `dept`.
///
/// A read-only tier's allow-list covers employee rows only; assignments and
/// change orders stay closed to it.
pub fn authorize_entity_write(
    tier: &AccessTier,
    target: WriteTarget,
    dept: Department,
) -> AppResult<()> {
    let allowed = match tier {
        AccessTier::ReadOnly { .. } => {
            target == WriteTarget::Employee && can_edit_department(tier, dept)
        }
        _ => can_edit_department(tier, dept),
    };

    if allowed {
        return Ok(());
    }

    debug!(
        tier = tier.label(),
        department = %dept,
        target = target.label(),
        "Entity write denied"
    );
    Err(AppError::forbidden(format!(
        "No permission to modify {} data for the {dept} department.",
        target.label()
    )))
}

/// Only full access may read hidden projects and their assignments.
pub fn authorize_hidden_data_access(tier: &AccessTier, include_hidden: bool) -> AppResult<()> {
    if !include_hidden || tier.is_full_access() {
        return Ok(());
    }
    debug!(tier = tier.label(), "Hidden data access denied");
    Err(AppError::forbidden(
        "No permission to view hidden projects.",
    ))
}

/// Gate for resources with no department owner (budgets, stage rows, capacity tables).
pub fn require_full_access(tier: &AccessTier, resource: &str) -> AppResult<()> {
    if tier.is_full_access() {
        return Ok(());
    }
    debug!(tier = tier.label(), resource, "Full access required");
    Err(AppError::forbidden(format!(
        "No permission to modify {resource}."
    )))
}
