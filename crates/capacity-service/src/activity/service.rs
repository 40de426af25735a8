//! Activity log entries written by clients and read back newest first.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use capacity_core::types::pagination::{PageRequest, PageResponse};
use capacity_core::{AppError, AppResult};
use capacity_database::repositories::ActivityLogRepository;
use capacity_entity::activity::{ActivityLog, CreateActivityLog};

use crate::context::RequestContext;

/// Client-submitted entry. The acting user comes from the request context.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    /// Verb such as `created` or `updated`.
    pub action: String,
    /// Model the entry refers to.
    pub model_name: String,
    /// ID of the affected row.
    #[serde(default)]
    pub object_id: String,
    /// Optional field changes.
    #[serde(default)]
    pub changes: Option<serde_json::Value>,
}

/// Activity log service.
#[derive(Debug, Clone)]
pub struct ActivityLogService {
    logs: Arc<ActivityLogRepository>,
}

impl ActivityLogService {
    /// Creates a new activity log service.
    pub fn new(logs: Arc<ActivityLogRepository>) -> Self {
        Self { logs }
    }

    /// Entries newest first, optionally for one user and/or model.
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        user_id: Option<Uuid>,
        model_name: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        self.logs.find_all(user_id, model_name, page).await
    }

    /// Gets one entry.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<ActivityLog> {
        self.logs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Activity log {id} not found")))
    }

    /// Records an entry for the caller.
    pub async fn record(&self, ctx: &RequestContext, entry: NewActivity) -> AppResult<ActivityLog> {
        let action = entry.action.trim();
        let model_name = entry.model_name.trim();
        if action.is_empty() || model_name.is_empty() {
            return Err(AppError::validation("Action and model name are required."));
        }

        let log = self
            .logs
            .create(&CreateActivityLog {
                user_id: ctx.user_id,
                action: action.to_string(),
                model_name: model_name.to_string(),
                object_id: entry.object_id,
                changes: entry.changes,
            })
            .await?;
        debug!(user_id = %ctx.user_id, action = %log.action, model = %log.model_name, "Activity recorded");
        Ok(log)
    }
}
