//! Database migration commands.

use clap::{Args, Subcommand};

use capacity_core::AppError;
use capacity_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply all pending embedded migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_dir: &str, env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_dir, env)?;
    let pool = super::create_db_pool(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let applied = run_migrations(&pool).await?;
            output::print_success(&format!("Schema up to date ({applied} migrations embedded)."));
        }
    }

    pool.close().await;
    Ok(())
}
