//! Capacity planner server.
//!
//! Loads configuration, connects to PostgreSQL, applies migrations and
//! serves the HTTP API until Ctrl+C.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use capacity_api::{AppState, run_server};
use capacity_core::config::AppConfig;
use capacity_database::DatabasePool;
use capacity_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("CAPACITY_ENV").unwrap_or_else(|_| "development".to_string());
    let config_dir = std::env::var("CAPACITY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    let config = match AppConfig::load_from(&config_dir, &env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, config_dir = %config_dir, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %format!("{e:#}"), "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting capacity planner");

    let db = DatabasePool::connect(&config.database)
        .await
        .context("connecting to PostgreSQL")?;
    let embedded = run_migrations(db.pool())
        .await
        .context("applying migrations")?;
    tracing::info!(embedded, "Migrations up to date");

    tracing::info!(
        max_active_sessions = config.session.max_active_sessions,
        inactivity_timeout_minutes = config.session.effective_timeout_minutes(),
        "Session policy"
    );

    let state = AppState::new(config, db.pool().clone());
    run_server(state).await.context("serving HTTP")?;

    db.close().await;
    Ok(())
}
