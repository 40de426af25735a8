//! In-memory session store using a Tokio mutex, for tests and single-node tooling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use capacity_core::{AppError, AppResult};
use capacity_entity::session::{CreateSession, UserSession};

use super::store::{Admission, SessionStore};

/// In-memory session store. The mutex makes count-then-insert atomic.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, UserSession>>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a session's `last_activity`. Test helper for idle scenarios.
    pub async fn set_last_activity(&self, id: Uuid, at: DateTime<Utc>) -> bool {
        match self.sessions.lock().await.get_mut(&id) {
            Some(session) => {
                session.last_activity = at;
                true
            }
            None => false,
        }
    }
}

fn active_of(
    sessions: &HashMap<Uuid, UserSession>,
    user_id: Option<Uuid>,
) -> impl Iterator<Item = &UserSession> {
    sessions
        .values()
        .filter(move |s| s.is_active && user_id.is_none_or(|u| s.user_id == u))
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_within_limit(
        &self,
        data: &CreateSession,
        max_active: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Admission> {
        let mut sessions = self.sessions.lock().await;

        let active = active_of(&sessions, Some(data.user_id)).count();
        if active >= max_active as usize {
            return Ok(Admission::AtCapacity);
        }
        if sessions.contains_key(&data.id)
            || sessions
                .values()
                .any(|s| s.refresh_token_hash == data.refresh_token_hash)
        {
            return Err(AppError::conflict("Session already exists"));
        }

        let session = UserSession {
            id: data.id,
            user_id: data.user_id,
            refresh_token_hash: data.refresh_token_hash.clone(),
            device_info: data.device_info.to_json(),
            created_at: now,
            last_activity: now,
            is_active: true,
        };
        sessions.insert(session.id, session.clone());
        Ok(Admission::Admitted(session))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserSession>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn touch(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        Ok(match sessions.get_mut(&id) {
            Some(s) if s.is_active && s.user_id == user_id => {
                s.last_activity = now;
                true
            }
            _ => false,
        })
    }

    async fn touch_latest(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        let latest = active_of(&sessions, Some(user_id))
            .max_by_key(|s| s.last_activity)
            .map(|s| s.id);
        Ok(match latest.and_then(|id| sessions.get_mut(&id)) {
            Some(s) => {
                s.last_activity = now;
                true
            }
            None => false,
        })
    }

    async fn deactivate_idle(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut swept = 0;
        for s in sessions.values_mut() {
            if s.is_active && s.is_stale(cutoff) {
                s.is_active = false;
                swept += 1;
            }
        }
        Ok(swept)
    }

    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        Ok(match sessions.get_mut(&id) {
            Some(s) if s.is_active && s.user_id == user_id => {
                s.is_active = false;
                true
            }
            _ => false,
        })
    }

    async fn deactivate_by_refresh_hash(&self, hash: &str, user_id: Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        let target = sessions
            .values_mut()
            .find(|s| s.is_active && s.user_id == user_id && s.refresh_token_hash == hash);
        Ok(match target {
            Some(s) => {
                s.is_active = false;
                true
            }
            None => false,
        })
    }

    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut count = 0;
        for s in sessions.values_mut() {
            if s.is_active && s.user_id == user_id {
                s.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn count_active(&self, user_id: Option<Uuid>) -> AppResult<u64> {
        let sessions = self.sessions.lock().await;
        Ok(active_of(&sessions, user_id).count() as u64)
    }

    async fn list_active(&self, user_id: Option<Uuid>) -> AppResult<Vec<UserSession>> {
        let sessions = self.sessions.lock().await;
        let mut list: Vec<UserSession> = active_of(&sessions, user_id).cloned().collect();
        list.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(list)
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: &str) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        Ok(match sessions.get_mut(&id) {
            Some(s) if s.is_active => {
                s.refresh_token_hash = hash.to_string();
                true
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capacity_entity::session::DeviceInfo;
    use chrono::Duration;

    fn create(user_id: Uuid, tag: &str) -> CreateSession {
        CreateSession {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash: tag.to_string(),
            device_info: DeviceInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_cap_is_per_user() {
        let store = MemorySessionStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();
        assert!(matches!(store.create_within_limit(&create(a, "1"), 1, now).await.unwrap(), Admission::Admitted(_)));
        assert!(matches!(store.create_within_limit(&create(a, "2"), 1, now).await.unwrap(), Admission::AtCapacity));
        assert!(matches!(store.create_within_limit(&create(b, "3"), 1, now).await.unwrap(), Admission::Admitted(_)));
        assert_eq!(store.count_active(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_touch_latest_updates_one_row() {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();
        let Admission::Admitted(old) = store.create_within_limit(&create(user, "1"), 2, now - Duration::minutes(5)).await.unwrap() else {
            panic!("expected admission");
        };
        let Admission::Admitted(recent) = store.create_within_limit(&create(user, "2"), 2, now - Duration::minutes(1)).await.unwrap() else {
            panic!("expected admission");
        };

        assert!(store.touch_latest(user, now).await.unwrap());
        let old = store.find_by_id(old.id).await.unwrap().unwrap();
        let recent = store.find_by_id(recent.id).await.unwrap().unwrap();
        assert_eq!(recent.last_activity, now);
        assert_eq!(old.last_activity, now - Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();
        store.create_within_limit(&create(user, "1"), 2, now - Duration::minutes(30)).await.unwrap();
        store.create_within_limit(&create(user, "2"), 2, now).await.unwrap();

        let cutoff = now - Duration::minutes(20);
        assert_eq!(store.deactivate_idle(cutoff).await.unwrap(), 1);
        assert_eq!(store.deactivate_idle(cutoff).await.unwrap(), 0);
        assert_eq!(store.count_active(Some(user)).await.unwrap(), 1);
    }
}
