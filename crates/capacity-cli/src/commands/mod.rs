//! CLI command definitions and dispatch.

pub mod migrate;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use capacity_core::AppError;
use capacity_core::config::AppConfig;
use capacity_database::DatabasePool;

use crate::output::OutputFormat;

/// Capacity planner maintenance
#[derive(Debug, Parser)]
#[command(name = "capacity-cli", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to merge over the defaults
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Session sweep and inspection
    Sessions(session::SessionArgs),
    /// User administration
    Users(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config, &self.env).await,
            Commands::Sessions(args) => {
                session::execute(args, &self.config, &self.env, self.format).await
            }
            Commands::Users(args) => user::execute(args, &self.config, &self.env, self.format).await,
        }
    }
}

/// Load configuration from the config directory
pub fn load_config(config_dir: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(config_dir, env)
}

/// Create a database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_with_minutes() {
        let cli = Cli::try_parse_from([
            "capacity-cli",
            "--format",
            "json",
            "sessions",
            "sweep",
            "--minutes",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Sessions(args) => match args.command {
                session::SessionCommand::Sweep { minutes } => assert_eq!(minutes, Some(5)),
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_user_commands() {
        let cli = Cli::try_parse_from(["capacity-cli", "users", "delete", "old@example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Users(user::UserArgs {
                command: user::UserCommand::Delete { ref email, force: false }
            }) if email == "old@example.com"
        ));

        assert!(Cli::try_parse_from(["capacity-cli", "users", "set-password"]).is_err());
    }
}
