//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use capacity_core::error::{AppError, ErrorKind};

/// Migrations compiled from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Run all pending database migrations and return how many are embedded.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, AppError> {
    let embedded = MIGRATOR.iter().count();
    info!(embedded, "Running database migrations...");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(embedded)
}
