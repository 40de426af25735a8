//! Session sweep and inspection commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use capacity_api::AppState;
use capacity_core::AppError;
use capacity_entity::session::UserSession;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Deactivate sessions idle longer than the timeout
    Sweep {
        /// Idle minutes before a session is closed (default: configured timeout, minimum 1)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// List active sessions
    List {
        /// Only sessions of this username
        #[arg(long)]
        user: Option<String>,
    },
    /// Count active sessions
    Count {
        /// Only sessions of this username
        #[arg(long)]
        user: Option<String>,
    },
    /// Close every session of a user
    RevokeUser {
        /// Username
        username: String,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Session ID
    id: String,
    /// User ID
    user_id: String,
    /// IP Address
    ip: String,
    /// User agent
    user_agent: String,
    /// Created
    created: String,
    /// Last Activity
    last_activity: String,
    /// Idle minutes
    idle_minutes: i64,
}

impl SessionRow {
    fn from_session(session: &UserSession) -> Self {
        let device = |key: &str| {
            session
                .device_info
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        };
        Self {
            id: session.id.to_string(),
            user_id: session.user_id.to_string(),
            ip: device("ip_address"),
            user_agent: device("user_agent"),
            created: session.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_activity: session.last_activity.format("%Y-%m-%d %H:%M:%S").to_string(),
            idle_minutes: session.idle_seconds(Utc::now()) / 60,
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config_dir: &str,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_dir, env)?;

    if let SessionCommand::Sweep { minutes } = &args.command {
        return sweep(config, *minutes, format).await;
    }

    let pool = super::create_db_pool(&config).await?;
    let state = AppState::new(config, pool.clone());

    match &args.command {
        SessionCommand::Sweep { .. } => {}
        SessionCommand::List { user } => {
            let user_id = resolve_user(&state, user.as_deref()).await?;
            let sessions = state.sessions.list_active(user_id).await?;
            let rows: Vec<SessionRow> = sessions.iter().map(SessionRow::from_session).collect();
            output::print_list(&rows, format);
        }
        SessionCommand::Count { user } => {
            let user_id = resolve_user(&state, user.as_deref()).await?;
            let count = state.sessions.count_active(user_id).await?;
            output::print_count("active_sessions", count, format);
        }
        SessionCommand::RevokeUser { username } => {
            let user_id = resolve_user(&state, Some(username)).await?.ok_or_else(|| {
                AppError::not_found(format!("User '{username}' not found"))
            })?;
            let closed = state.sessions.invalidate_all(user_id).await?;
            output::print_success(&format!("Closed {closed} session(s) of '{username}'"));
        }
    }

    pool.close().await;
    Ok(())
}

/// Run the inactivity sweep. An unreachable database is reported and skipped.
async fn sweep(
    config: capacity_core::config::AppConfig,
    minutes: Option<u64>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let minutes = minutes.unwrap_or_else(|| config.session.effective_timeout_minutes());

    let pool = match super::create_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "Session sweep skipped: database unavailable");
            output::print_warning("Session sweep skipped: database unavailable.");
            return Ok(());
        }
    };

    let state = AppState::new(config, pool.clone());
    match state.sessions.sweep_older_than(minutes, Utc::now()).await {
        Ok(swept) => output::print_count("sessions_deactivated", swept, format),
        Err(e) => {
            warn!(error = %e, "Session sweep failed");
            output::print_warning("Session sweep skipped: the session store did not respond.");
        }
    }

    pool.close().await;
    Ok(())
}

async fn resolve_user(
    state: &AppState,
    username: Option<&str>,
) -> Result<Option<uuid::Uuid>, AppError> {
    let Some(username) = username else {
        return Ok(None);
    };
    let user = state
        .directory
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;
    Ok(Some(user.id))
}
