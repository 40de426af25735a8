//! Access tiers.

use serde::Serialize;

use capacity_entity::department::Department;

/// The resolved access level of a principal. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", content = "department", rename_all = "snake_case")]
pub enum AccessTier {
    /// May read and write everything.
    FullAccess,
    /// Full access plus the user-management endpoints.
    BusinessIntelligence,
    /// May write only entities of one department (or its shared group).
    DepartmentScoped(Department),
    /// May not write, except Employee rows of the listed departments.
    ReadOnly {
        /// Departments whose employees this principal may still edit.
        #[serde(skip)]
        employee_editable: &'static [Department],
    },
}

impl AccessTier {
    /// Whether this tier grants full access.
    pub fn is_full_access(&self) -> bool {
        matches!(self, Self::FullAccess | Self::BusinessIntelligence)
    }

    /// Whether this tier is read-only.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// The scoped department, if any.
    pub fn scoped_department(&self) -> Option<Department> {
        match self {
            Self::DepartmentScoped(dept) => Some(*dept),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullAccess => "full_access",
            Self::BusinessIntelligence => "business_intelligence",
            Self::DepartmentScoped(_) => "department_scoped",
            Self::ReadOnly { .. } => "read_only",
        }
    }
}
