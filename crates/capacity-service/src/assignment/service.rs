//! Assignment CRUD. An assignment belongs to its employee's department.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::{WriteTarget, authorize_hidden_data_access};
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{AssignmentFilter, AssignmentRepository, EmployeeRepository};
use capacity_entity::assignment::{Assignment, AssignmentInput};
use capacity_entity::department::Department;

use crate::context::RequestContext;
use crate::guard::authorize_transition;

/// Assignment service.
#[derive(Debug, Clone)]
pub struct AssignmentService {
    assignments: Arc<AssignmentRepository>,
    employees: Arc<EmployeeRepository>,
}

impl AssignmentService {
    /// Creates a new assignment service.
    pub fn new(assignments: Arc<AssignmentRepository>, employees: Arc<EmployeeRepository>) -> Self {
        Self {
            assignments,
            employees,
        }
    }

    /// Lists assignments. Rows of hidden projects need full access and an explicit flag.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &AssignmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Assignment>> {
        authorize_hidden_data_access(&ctx.tier, filter.include_hidden)?;
        self.assignments.find_all(filter, page).await
    }

    /// Gets one assignment.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<Assignment> {
        self.load(id).await
    }

    /// Creates an assignment for an employee of an editable department.
    pub async fn create(&self, ctx: &RequestContext, input: &AssignmentInput) -> AppResult<Assignment> {
        input.check()?;
        let department = self.employee_department(input.employee_id).await?;
        authorize_transition(&ctx.tier, WriteTarget::Assignment, None, Some(department))?;

        let assignment = self.assignments.create(input).await?;
        info!(
            user_id = %ctx.user_id,
            assignment_id = %assignment.id,
            employee_id = %assignment.employee_id,
            week = %assignment.week_start_date,
            hours = assignment.hours,
            "Assignment created"
        );
        Ok(assignment)
    }

    /// Replaces an assignment. Moving it to another employee needs both departments.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: &AssignmentInput,
    ) -> AppResult<Assignment> {
        input.check()?;
        let current = self.load(id).await?;
        let old = self.employee_department(current.employee_id).await?;
        let new = if input.employee_id == current.employee_id {
            old
        } else {
            self.employee_department(input.employee_id).await?
        };
        authorize_transition(&ctx.tier, WriteTarget::Assignment, Some(old), Some(new))?;

        let assignment = self
            .assignments
            .update(id, input)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(user_id = %ctx.user_id, assignment_id = %id, "Assignment updated");
        Ok(assignment)
    }

    /// Deletes an assignment of an editable department.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let current = self.load(id).await?;
        let department = self.employee_department(current.employee_id).await?;
        authorize_transition(&ctx.tier, WriteTarget::Assignment, Some(department), None)?;

        if !self.assignments.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, assignment_id = %id, "Assignment deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<Assignment> {
        self.assignments.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn employee_department(&self, employee_id: Uuid) -> AppResult<Department> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .map(|e| e.department)
            .ok_or_else(|| AppError::validation(format!("Employee {employee_id} does not exist.")))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Assignment {id} not found"))
}
