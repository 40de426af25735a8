//! Employee repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_entity::department::Department;
use capacity_entity::employee::{Employee, EmployeeInput};

use super::db_error;

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Restrict to one department.
    pub department: Option<Department>,
    /// Restrict to an active flag. `None` lists everyone.
    pub is_active: Option<bool>,
    /// Case-insensitive substring of name or role.
    pub search: Option<String>,
}

/// Repository for employee CRUD.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an employee by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find employee", e))
    }

    /// List employees ordered by department and name.
    pub async fn find_all(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Employee>> {
        const WHERE: &str = "WHERE ($1::department IS NULL OR department = $1) \
             AND ($2::boolean IS NULL OR is_active = $2) \
             AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR role ILIKE '%' || $3 || '%')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM employees {WHERE}"))
            .bind(filter.department)
            .bind(filter.is_active)
            .bind(&filter.search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count employees", e))?;

        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT * FROM employees {WHERE} ORDER BY department, name LIMIT $4 OFFSET $5"
        ))
        .bind(filter.department)
        .bind(filter.is_active)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list employees", e))?;

        Ok(PageResponse::new(employees, *page, total as u64))
    }

    /// Create a new employee.
    pub async fn create(&self, data: &EmployeeInput) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, role, department, capacity, is_active, \
             is_subcontracted_material, subcontract_company, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.role)
        .bind(data.department)
        .bind(data.capacity)
        .bind(data.is_active)
        .bind(data.is_subcontracted_material)
        .bind(&data.subcontract_company)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create employee", e))
    }

    /// Replace every writable field of an employee.
    pub async fn update(&self, id: Uuid, data: &EmployeeInput) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "UPDATE employees SET name = $2, role = $3, department = $4, capacity = $5, \
             is_active = $6, is_subcontracted_material = $7, subcontract_company = $8, \
             user_id = $9, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.role)
        .bind(data.department)
        .bind(data.capacity)
        .bind(data.is_active)
        .bind(data.is_subcontracted_material)
        .bind(&data.subcontract_company)
        .bind(data.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update employee", e))
    }

    /// Delete an employee.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete employee", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Link the single unlinked employee whose name matches, if exactly one does.
    pub async fn link_unclaimed_by_name(&self, name: &str, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE employees SET user_id = $2, updated_at = NOW() \
             WHERE user_id IS NULL AND LOWER(name) = LOWER($1) \
             AND (SELECT COUNT(*) FROM employees \
                  WHERE user_id IS NULL AND LOWER(name) = LOWER($1)) = 1",
        )
        .bind(name.trim())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to link employee", e))?;
        Ok(result.rows_affected() > 0)
    }
}
