//! Employee CRUD under the department write rules.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::WriteTarget;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{EmployeeFilter, EmployeeRepository};
use capacity_entity::employee::{Employee, EmployeeInput};

use crate::context::RequestContext;
use crate::guard::authorize_transition;

/// Employee reads and department-scoped writes.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    employees: Arc<EmployeeRepository>,
}

impl EmployeeService {
    /// Creates a new employee service.
    pub fn new(employees: Arc<EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// Lists employees. Any authenticated principal may read.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Employee>> {
        self.employees.find_all(filter, page).await
    }

    /// Gets one employee.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<Employee> {
        self.load(id).await
    }

    /// Creates an employee in a department the caller may edit.
    pub async fn create(&self, ctx: &RequestContext, input: &EmployeeInput) -> AppResult<Employee> {
        authorize_transition(&ctx.tier, WriteTarget::Employee, None, Some(input.department))?;
        input.check()?;

        let employee = self.employees.create(input).await?;
        info!(
            user_id = %ctx.user_id,
            employee_id = %employee.id,
            department = %employee.department,
            "Employee created"
        );
        Ok(employee)
    }

    /// Replaces an employee. Both the stored and the new department must be editable.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: &EmployeeInput,
    ) -> AppResult<Employee> {
        let current = self.load(id).await?;
        authorize_transition(
            &ctx.tier,
            WriteTarget::Employee,
            Some(current.department),
            Some(input.department),
        )?;
        input.check()?;

        let employee = self
            .employees
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))?;
        info!(
            user_id = %ctx.user_id,
            employee_id = %id,
            from = %current.department,
            to = %employee.department,
            "Employee updated"
        );
        Ok(employee)
    }

    /// Deletes an employee owned by an editable department.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let current = self.load(id).await?;
        authorize_transition(&ctx.tier, WriteTarget::Employee, Some(current.department), None)?;

        if !self.employees.delete(id).await? {
            return Err(AppError::not_found(format!("Employee {id} not found")));
        }
        info!(user_id = %ctx.user_id, employee_id = %id, "Employee deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<Employee> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context::context;
    use crate::test_support::lazy_pool;
    use capacity_core::ErrorKind;
    use capacity_entity::department::{Department, UserDepartment};

    fn input(department: Department) -> EmployeeInput {
        EmployeeInput {
            name: "Luis Pena".to_string(),
            role: "Controls Engineer".to_string(),
            department,
            capacity: 45.0,
            is_active: true,
            is_subcontracted_material: false,
            subcontract_company: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_in_foreign_department_denied_before_storage() {
        let service = EmployeeService::new(Arc::new(EmployeeRepository::new(lazy_pool())));
        let ctx = context(Some(UserDepartment::Hd), None);

        let err = service.create(&ctx, &input(Department::Prg)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("PRG"));
    }

    #[tokio::test]
    async fn test_read_only_without_carve_out_cannot_create() {
        let service = EmployeeService::new(Arc::new(EmployeeRepository::new(lazy_pool())));
        let ctx = context(None, None);

        let err = service.create(&ctx, &input(Department::Med)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
}
