//! The authenticated actor as seen by authorization code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use capacity_entity::department::{Department, OtherDepartment, UserDepartment};
use capacity_entity::user::User;

/// Attributes of a logged-in user that drive authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub user_id: Uuid,
    /// Login name.
    pub username: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Staff flag.
    pub is_staff: bool,
    /// Department from the user profile.
    pub department: Option<UserDepartment>,
    /// Sub-classification when the profile department is `OTHER`.
    pub other_department: Option<OtherDepartment>,
    /// Department of the linked employee row, used when the profile has none.
    pub employee_department: Option<Department>,
}

impl Principal {
    /// Elevated-access flag (superuser or staff).
    pub fn is_elevated(&self) -> bool {
        self.is_superuser || self.is_staff
    }

    /// The `(department, other_department)` pair used for tier resolution.
    ///
    /// The profile wins; without one, the linked employee's department is used.
    pub fn affiliation(&self) -> (Option<UserDepartment>, Option<OtherDepartment>) {
        match self.department {
            Some(dept) => (Some(dept), self.other_department),
            None => (self.employee_department.map(UserDepartment::from), None),
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
            department: user.department,
            other_department: user.other_department,
            employee_department: user.employee_department,
        }
    }
}
