//! Weekly capacity repositories.
//!
//! The four capacity tables share one shape: a key column, a week, and a
//! value, unique on `(key, week)`. Creation is an upsert on that pair.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_entity::capacity::{
    DepartmentWeeklyTotal, PrgExternalTeamCapacity, ScioTeamCapacity, SubcontractedTeamCapacity,
};
use capacity_entity::department::Department;

use super::db_error;

macro_rules! weekly_repository {
    (
        $(#[$meta:meta])*
        $name:ident, $row:ty, $table:literal, $key_col:literal, $key_ty:ty, $key_cast:literal,
        $value_col:literal, $value_ty:ty
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pool: PgPool,
        }

        impl $name {
            /// Create a new repository.
            pub fn new(pool: PgPool) -> Self {
                Self { pool }
            }

            /// Find a row by ID.
            pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<$row>> {
                sqlx::query_as::<_, $row>(concat!("SELECT * FROM ", $table, " WHERE id = $1"))
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| db_error(concat!("Failed to find ", $table), e))
            }

            /// Rows filtered by key and week range, ordered by key then week.
            pub async fn find_filtered(
                &self,
                key: Option<$key_ty>,
                week_from: Option<NaiveDate>,
                week_until: Option<NaiveDate>,
            ) -> AppResult<Vec<$row>> {
                sqlx::query_as::<_, $row>(concat!(
                    "SELECT * FROM ", $table,
                    " WHERE ($1::", $key_cast, " IS NULL OR ", $key_col, " = $1)",
                    " AND ($2::date IS NULL OR week_start_date >= $2)",
                    " AND ($3::date IS NULL OR week_start_date <= $3)",
                    " ORDER BY ", $key_col, ", week_start_date"
                ))
                .bind(key)
                .bind(week_from)
                .bind(week_until)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error(concat!("Failed to list ", $table), e))
            }

            /// Insert or overwrite the row for `(key, week)`.
            pub async fn upsert(
                &self,
                key: $key_ty,
                week_start_date: NaiveDate,
                value: $value_ty,
            ) -> AppResult<$row> {
                sqlx::query_as::<_, $row>(concat!(
                    "INSERT INTO ", $table, " (", $key_col, ", week_start_date, ", $value_col, ")",
                    " VALUES ($1, $2, $3)",
                    " ON CONFLICT (", $key_col, ", week_start_date)",
                    " DO UPDATE SET ", $value_col, " = EXCLUDED.", $value_col, ", updated_at = NOW()",
                    " RETURNING *"
                ))
                .bind(key)
                .bind(week_start_date)
                .bind(value)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(concat!("Failed to upsert ", $table), e))
            }

            /// Replace a row by ID.
            pub async fn update(
                &self,
                id: Uuid,
                key: $key_ty,
                week_start_date: NaiveDate,
                value: $value_ty,
            ) -> AppResult<Option<$row>> {
                sqlx::query_as::<_, $row>(concat!(
                    "UPDATE ", $table, " SET ", $key_col, " = $2, week_start_date = $3, ",
                    $value_col, " = $4, updated_at = NOW() WHERE id = $1 RETURNING *"
                ))
                .bind(id)
                .bind(key)
                .bind(week_start_date)
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error(concat!("Failed to update ", $table), e))
            }

            /// Delete a row by ID.
            pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
                let result = sqlx::query(concat!("DELETE FROM ", $table, " WHERE id = $1"))
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| db_error(concat!("Failed to delete ", $table), e))?;
                Ok(result.rows_affected() > 0)
            }
        }
    };
}

weekly_repository!(
    /// SCIO team capacity per department and week.
    ScioCapacityRepository, ScioTeamCapacity, "scio_team_capacities",
    "department", Department, "department", "capacity", f64
);

weekly_repository!(
    /// Subcontracted personnel per company and week.
    SubcontractedCapacityRepository, SubcontractedTeamCapacity, "subcontracted_team_capacities",
    "company", String, "text", "capacity", i32
);

weekly_repository!(
    /// External PRG personnel per team and week.
    PrgExternalCapacityRepository, PrgExternalTeamCapacity, "prg_external_team_capacities",
    "team_name", String, "text", "capacity", i32
);

weekly_repository!(
    /// Occupancy hours per department and week.
    WeeklyTotalRepository, DepartmentWeeklyTotal, "department_weekly_totals",
    "department", Department, "department", "total_hours", f64
);
