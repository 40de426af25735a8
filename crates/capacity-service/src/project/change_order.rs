//! Change orders, owned by their department.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::WriteTarget;
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::ChangeOrderRepository;
use capacity_entity::department::Department;
use capacity_entity::project::{ChangeOrderInput, ProjectChangeOrder};

use crate::context::RequestContext;
use crate::guard::authorize_transition;

/// Change order service.
#[derive(Debug, Clone)]
pub struct ChangeOrderService {
    change_orders: Arc<ChangeOrderRepository>,
}

impl ChangeOrderService {
    /// Creates a new change order service.
    pub fn new(change_orders: Arc<ChangeOrderRepository>) -> Self {
        Self { change_orders }
    }

    /// Change orders filtered by project and/or department.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        project_id: Option<Uuid>,
        department: Option<Department>,
    ) -> AppResult<Vec<ProjectChangeOrder>> {
        self.change_orders.find_filtered(project_id, department).await
    }

    /// Gets one change order.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<ProjectChangeOrder> {
        self.load(id).await
    }

    /// Creates a change order for an editable department.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: &ChangeOrderInput,
    ) -> AppResult<ProjectChangeOrder> {
        authorize_transition(&ctx.tier, WriteTarget::ChangeOrder, None, Some(input.department))?;
        input.check()?;
        let order = self.change_orders.create(input).await?;
        info!(
            user_id = %ctx.user_id,
            change_order_id = %order.id,
            department = %order.department,
            "Change order created"
        );
        Ok(order)
    }

    /// Replaces a change order; the stored and new departments must both be editable.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: &ChangeOrderInput,
    ) -> AppResult<ProjectChangeOrder> {
        let current = self.load(id).await?;
        authorize_transition(
            &ctx.tier,
            WriteTarget::ChangeOrder,
            Some(current.department),
            Some(input.department),
        )?;
        input.check()?;
        let order = self
            .change_orders
            .update(id, input)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(user_id = %ctx.user_id, change_order_id = %id, "Change order updated");
        Ok(order)
    }

    /// Deletes a change order of an editable department.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let current = self.load(id).await?;
        authorize_transition(&ctx.tier, WriteTarget::ChangeOrder, Some(current.department), None)?;
        if !self.change_orders.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, change_order_id = %id, "Change order deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<ProjectChangeOrder> {
        self.change_orders.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Change order {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context::context;
    use crate::test_support::lazy_pool;
    use capacity_core::ErrorKind;
    use capacity_entity::department::UserDepartment;

    fn input(department: Department, hours: f64) -> ChangeOrderInput {
        ChangeOrderInput {
            project_id: Uuid::new_v4(),
            department,
            name: "CO-7 extra cell".to_string(),
            hours_quoted: hours,
        }
    }

    #[tokio::test]
    async fn test_create_checks_department_first() {
        let service = ChangeOrderService::new(Arc::new(ChangeOrderRepository::new(lazy_pool())));
        let ctx = context(Some(UserDepartment::Mfg), None);

        let err = service.create(&ctx, &input(Department::Med, 10.0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = service.create(&ctx, &input(Department::Build, -1.0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
