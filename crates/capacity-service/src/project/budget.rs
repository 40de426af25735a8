//! Project budgets. Full access only for writes.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::require_full_access;
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::BudgetRepository;
use capacity_entity::department::Department;
use capacity_entity::project::{BudgetHoursPatch, ProjectBudget};

use crate::context::RequestContext;

const RESOURCE: &str = "project budgets";

/// Budget service.
#[derive(Debug, Clone)]
pub struct BudgetService {
    budgets: Arc<BudgetRepository>,
}

impl BudgetService {
    /// Creates a new budget service.
    pub fn new(budgets: Arc<BudgetRepository>) -> Self {
        Self { budgets }
    }

    /// Budgets, optionally for one project.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        project_id: Option<Uuid>,
    ) -> AppResult<Vec<ProjectBudget>> {
        self.budgets.find_by_project(project_id).await
    }

    /// Gets one budget.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<ProjectBudget> {
        self.budgets.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Creates the budget of a project department. Missing hours default to zero.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        department: Department,
        hours: &BudgetHoursPatch,
    ) -> AppResult<ProjectBudget> {
        require_full_access(&ctx.tier, RESOURCE)?;
        hours.check()?;
        let budget = self.budgets.create(project_id, department, hours).await?;
        info!(user_id = %ctx.user_id, budget_id = %budget.id, %department, "Budget created");
        Ok(budget)
    }

    /// Partial update by budget ID.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        hours: &BudgetHoursPatch,
    ) -> AppResult<ProjectBudget> {
        require_full_access(&ctx.tier, RESOURCE)?;
        hours.check()?;
        let budget = self.budgets.patch_by_id(id, hours).await?.ok_or_else(|| not_found(id))?;
        info!(user_id = %ctx.user_id, budget_id = %id, "Budget updated");
        Ok(budget)
    }

    /// Patch the hours of `(project, department)`, creating the row when it is missing.
    pub async fn update_budget_hours(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        department: Department,
        hours: &BudgetHoursPatch,
    ) -> AppResult<ProjectBudget> {
        require_full_access(&ctx.tier, RESOURCE)?;
        hours.check()?;

        let budget = match self.budgets.patch_hours(project_id, department, hours).await? {
            Some(budget) => budget,
            None => self.budgets.create(project_id, department, hours).await?,
        };
        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            %department,
            hours_allocated = budget.hours_allocated,
            "Budget hours updated"
        );
        Ok(budget)
    }

    /// Deletes a budget row.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        require_full_access(&ctx.tier, RESOURCE)?;
        if !self.budgets.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, budget_id = %id, "Budget deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Budget {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context::context;
    use crate::test_support::lazy_pool;
    use capacity_core::ErrorKind;
    use capacity_entity::department::UserDepartment;

    #[tokio::test]
    async fn test_scoped_principal_cannot_touch_budgets() {
        let service = BudgetService::new(Arc::new(BudgetRepository::new(lazy_pool())));
        let ctx = context(Some(UserDepartment::Med), None);
        let hours = BudgetHoursPatch {
            hours_allocated: Some(10.0),
            ..BudgetHoursPatch::default()
        };

        let err = service
            .update_budget_hours(&ctx, Uuid::new_v4(), Department::Med, &hours)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "No permission to modify project budgets.");
    }

    #[tokio::test]
    async fn test_negative_hours_rejected() {
        let service = BudgetService::new(Arc::new(BudgetRepository::new(lazy_pool())));
        let ctx = context(Some(UserDepartment::Pm), None);
        let hours = BudgetHoursPatch {
            hours_forecast: Some(-5.0),
            ..BudgetHoursPatch::default()
        };

        let err = service.update(&ctx, Uuid::new_v4(), &hours).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
