//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use capacity_core::result::AppResult;
use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_entity::user::{CreateUser, UpdateUserProfile, User};

use super::db_error;

/// Users joined with the department of their linked employee row.
const SELECT_USER: &str = "SELECT u.*, e.department AS employee_department \
     FROM users u LEFT JOIN employees e ON e.user_id = u.id";

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by id", e))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} WHERE LOWER(u.username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by username", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} WHERE LOWER(u.email) = LOWER($1) ORDER BY u.date_joined LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by email", e))
    }

    /// Whether a username or email is already taken (case-insensitive).
    pub async fn identity_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users \
             WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2))",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check user identity", e))
    }

    /// Self-registered accounts (neither staff nor superuser), newest first.
    pub async fn find_registered(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE NOT is_staff AND NOT is_superuser")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} WHERE NOT u.is_staff AND NOT u.is_superuser \
             ORDER BY u.date_joined DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list users", e))?;

        Ok(PageResponse::new(users, *page, total as u64))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, \
             department, other_department) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.department)
        .bind(data.other_department)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create user", e))?;

        self.require(id).await
    }

    /// Apply an administrative profile update.
    pub async fn update_profile(&self, id: Uuid, data: &UpdateUserProfile) -> AppResult<User> {
        sqlx::query(
            "UPDATE users SET \
             email = COALESCE($2, email), \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             is_active = COALESCE($5, is_active), \
             department = COALESCE($6, department), \
             other_department = CASE \
                 WHEN COALESCE($6, department) = 'OTHER' THEN COALESCE($7, other_department) \
                 ELSE NULL END \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.is_active)
        .bind(data.department)
        .bind(data.other_department)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update user", e))?;

        self.require(id).await
    }

    /// Replace the stored password hash.
    pub async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update password", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    pub async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to record login", e))?;
        Ok(())
    }

    /// Delete a user by ID.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn require(&self, id: Uuid) -> AppResult<User> {
        self.find_by_id(id).await?.ok_or_else(|| {
            capacity_core::AppError::not_found(format!("User {id} not found"))
        })
    }
}
