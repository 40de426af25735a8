//! Weekly capacity service, shared by the four tables.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use capacity_auth::policy::require_full_access;
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{
    PrgExternalCapacityRepository, ScioCapacityRepository, SubcontractedCapacityRepository,
    WeeklyTotalRepository,
};

use super::table::WeeklyTable;
use crate::context::RequestContext;

/// Reads for everyone, writes for full access only.
#[derive(Debug, Clone)]
pub struct WeeklyCapacityService<T: WeeklyTable> {
    table: Arc<T>,
}

/// SCIO team capacity per department.
pub type ScioCapacityService = WeeklyCapacityService<ScioCapacityRepository>;
/// Subcontracted personnel per company.
pub type SubcontractedCapacityService = WeeklyCapacityService<SubcontractedCapacityRepository>;
/// External PRG personnel per team.
pub type PrgExternalCapacityService = WeeklyCapacityService<PrgExternalCapacityRepository>;
/// Department occupancy per week.
pub type WeeklyTotalService = WeeklyCapacityService<WeeklyTotalRepository>;

impl<T: WeeklyTable> WeeklyCapacityService<T> {
    /// Creates a service over one table.
    pub fn new(table: Arc<T>) -> Self {
        Self { table }
    }

    /// Rows filtered by key and week range.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        key: Option<T::Key>,
        week_from: Option<NaiveDate>,
        week_until: Option<NaiveDate>,
    ) -> AppResult<Vec<T::Row>> {
        self.table.find_filtered(key, week_from, week_until).await
    }

    /// Gets one row.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<T::Row> {
        self.table.find_by_id(id).await?.ok_or_else(|| not_found::<T>(id))
    }

    /// Creates the row for `(key, week)`, overwriting an existing one.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        key: T::Key,
        week: NaiveDate,
        value: T::Value,
    ) -> AppResult<T::Row> {
        self.check_write(ctx, &key, value)?;
        info!(user_id = %ctx.user_id, table = T::RESOURCE, %key, %week, "Weekly capacity set");
        self.table.upsert(key, week, value).await
    }

    /// Replaces a row by ID.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        key: T::Key,
        week: NaiveDate,
        value: T::Value,
    ) -> AppResult<T::Row> {
        self.check_write(ctx, &key, value)?;
        let row = self
            .table
            .update(id, key, week, value)
            .await?
            .ok_or_else(|| not_found::<T>(id))?;
        info!(user_id = %ctx.user_id, table = T::RESOURCE, row_id = %id, "Weekly capacity updated");
        Ok(row)
    }

    /// Deletes a row by ID.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        require_full_access(&ctx.tier, T::RESOURCE)?;
        if !self.table.delete(id).await? {
            return Err(not_found::<T>(id));
        }
        info!(user_id = %ctx.user_id, table = T::RESOURCE, row_id = %id, "Weekly capacity deleted");
        Ok(())
    }

    fn check_write(&self, ctx: &RequestContext, key: &T::Key, value: T::Value) -> AppResult<()> {
        require_full_access(&ctx.tier, T::RESOURCE)?;
        T::check_key(key)?;
        let value: f64 = value.into();
        if !(value >= 0.0 && value.is_finite()) {
            return Err(AppError::validation("Capacity cannot be negative."));
        }
        Ok(())
    }
}

fn not_found<T: WeeklyTable>(id: Uuid) -> AppError {
    AppError::not_found(format!("No {} row {id}", T::RESOURCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context::context;
    use crate::test_support::lazy_pool;
    use capacity_core::ErrorKind;
    use capacity_entity::department::{Department, OtherDepartment, UserDepartment};

    fn monday() -> NaiveDate {
        "2025-03-03".parse().unwrap()
    }

    #[tokio::test]
    async fn test_scoped_principal_cannot_write() {
        let service = ScioCapacityService::new(Arc::new(ScioCapacityRepository::new(lazy_pool())));
        let ctx = context(Some(UserDepartment::Med), None);

        let err = service
            .create(&ctx, Department::Med, monday(), 120.0)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "No permission to modify SCIO team capacity.");
    }

    #[tokio::test]
    async fn test_values_and_keys_checked_after_access() {
        let service = SubcontractedCapacityService::new(Arc::new(
            SubcontractedCapacityRepository::new(lazy_pool()),
        ));
        let ctx = context(
            Some(UserDepartment::Other),
            Some(OtherDepartment::BusinessIntelligence),
        );

        let err = service
            .create(&ctx, "Acme Robotics".to_string(), monday(), -2)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .create(&ctx, "   ".to_string(), monday(), 3)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
