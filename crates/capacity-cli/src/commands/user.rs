//! User administration commands.

use clap::{Args, Subcommand};
use tracing::info;

use capacity_api::AppState;
use capacity_core::AppError;
use capacity_database::repositories::UserRepository;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Remove a user by email
    Delete {
        /// Email address
        email: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Prompt for a new password, apply the policy, end every session
    SetPassword {
        /// Username
        username: String,
    },
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_dir: &str,
    env: &str,
    _format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_dir, env)?;
    let pool = super::create_db_pool(&config).await?;
    let users = UserRepository::new(pool.clone());
    let state = AppState::new(config, pool.clone());

    match &args.command {
        UserCommand::Delete { email, force } => {
            let Some(user) = users.find_by_email(email.trim()).await? else {
                output::print_warning(&format!("User with email '{email}' not found."));
                pool.close().await;
                return Ok(());
            };

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete user '{}' ({})?", user.username, user.email))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    pool.close().await;
                    return Ok(());
                }
            }

            state.sessions.invalidate_all(user.id).await?;
            users.delete(user.id).await?;
            info!(user_id = %user.id, "User deleted from CLI");
            output::print_success(&format!("User '{}' deleted", user.email));
        }
        UserCommand::SetPassword { username } => {
            let user = users
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;

            let password = dialoguer::Password::new()
                .with_prompt(format!("New password for '{}'", user.username))
                .with_confirmation("Repeat password", "Passwords do not match.")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            let closed = state.accounts.reset_password(user.id, &password).await?;
            output::print_success(&format!(
                "Password updated for '{}'; {closed} session(s) closed",
                user.username
            ));
        }
    }

    pool.close().await;
    Ok(())
}
