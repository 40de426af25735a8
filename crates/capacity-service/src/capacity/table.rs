//! One trait over the four `(key, week) -> value` capacity tables.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use capacity_core::{AppError, AppResult};
use capacity_database::repositories::{
    PrgExternalCapacityRepository, ScioCapacityRepository, SubcontractedCapacityRepository,
    WeeklyTotalRepository,
};
use capacity_entity::capacity::{
    DepartmentWeeklyTotal, PrgExternalTeamCapacity, ScioTeamCapacity, SubcontractedTeamCapacity,
};
use capacity_entity::department::Department;

/// Storage of one weekly table, unique on `(key, week)`.
#[async_trait]
pub trait WeeklyTable: Send + Sync + std::fmt::Debug {
    /// Row key: a department, a company or a team.
    type Key: Clone + Send + Sync + std::fmt::Display + 'static;
    /// Stored quantity.
    type Value: Copy + Send + Sync + Into<f64> + 'static;
    /// Row model.
    type Row: Serialize + Send + 'static;

    /// Resource name used in denial messages.
    const RESOURCE: &'static str;

    /// Reject keys the table cannot hold.
    fn check_key(_key: &Self::Key) -> AppResult<()> {
        Ok(())
    }

    /// Find a row by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Self::Row>>;

    /// Rows filtered by key and week range.
    async fn find_filtered(
        &self,
        key: Option<Self::Key>,
        week_from: Option<NaiveDate>,
        week_until: Option<NaiveDate>,
    ) -> AppResult<Vec<Self::Row>>;

    /// Insert or overwrite the row for `(key, week)`.
    async fn upsert(&self, key: Self::Key, week: NaiveDate, value: Self::Value) -> AppResult<Self::Row>;

    /// Replace a row by ID.
    async fn update(
        &self,
        id: Uuid,
        key: Self::Key,
        week: NaiveDate,
        value: Self::Value,
    ) -> AppResult<Option<Self::Row>>;

    /// Delete a row by ID.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

fn non_blank(key: &str, what: &str) -> AppResult<()> {
    if key.trim().is_empty() {
        return Err(AppError::validation(format!("The {what} is required.")));
    }
    Ok(())
}

macro_rules! weekly_table {
    ($repo:ty, $row:ty, $key:ty, $value:ty, $resource:literal $(, $check:expr)?) => {
        #[async_trait]
        impl WeeklyTable for $repo {
            type Key = $key;
            type Value = $value;
            type Row = $row;

            const RESOURCE: &'static str = $resource;

            $(
                fn check_key(key: &Self::Key) -> AppResult<()> {
                    ($check)(key)
                }
            )?

            async fn find_by_id(&self, id: Uuid) -> AppResult<Option<$row>> {
                <$repo>::find_by_id(self, id).await
            }

            async fn find_filtered(
                &self,
                key: Option<$key>,
                week_from: Option<NaiveDate>,
                week_until: Option<NaiveDate>,
            ) -> AppResult<Vec<$row>> {
                <$repo>::find_filtered(self, key, week_from, week_until).await
            }

            async fn upsert(&self, key: $key, week: NaiveDate, value: $value) -> AppResult<$row> {
                <$repo>::upsert(self, key, week, value).await
            }

            async fn update(
                &self,
                id: Uuid,
                key: $key,
                week: NaiveDate,
                value: $value,
            ) -> AppResult<Option<$row>> {
                <$repo>::update(self, id, key, week, value).await
            }

            async fn delete(&self, id: Uuid) -> AppResult<bool> {
                <$repo>::delete(self, id).await
            }
        }
    };
}

weekly_table!(
    ScioCapacityRepository, ScioTeamCapacity, Department, f64, "SCIO team capacity"
);
weekly_table!(
    SubcontractedCapacityRepository, SubcontractedTeamCapacity, String, i32,
    "subcontracted team capacity", |key: &String| non_blank(key, "company")
);
weekly_table!(
    PrgExternalCapacityRepository, PrgExternalTeamCapacity, String, i32,
    "PRG external team capacity", |key: &String| non_blank(key, "team name")
);
weekly_table!(
    WeeklyTotalRepository, DepartmentWeeklyTotal, Department, f64, "department weekly totals"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_must_not_be_blank() {
        assert!(SubcontractedCapacityRepository::check_key(&"Acme Robotics".to_string()).is_ok());
        assert!(SubcontractedCapacityRepository::check_key(&" ".to_string()).is_err());
        assert!(PrgExternalCapacityRepository::check_key(&String::new()).is_err());
    }

    #[test]
    fn test_department_keys_are_always_valid() {
        assert!(ScioCapacityRepository::check_key(&Department::Prg).is_ok());
        assert!(WeeklyTotalRepository::check_key(&Department::Build).is_ok());
    }
}
