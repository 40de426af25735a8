//! Shared fixtures for in-memory auth tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use capacity_core::config::AuthConfig;
use capacity_entity::department::UserDepartment;
use capacity_entity::session::DeviceInfo;
use capacity_entity::user::User;

use crate::jwt::{Claims, JwtDecoder, JwtEncoder, TokenType};
use crate::password::PasswordHasher;
use crate::session::{
    LoginOutcome, MemorySessionStore, MemoryUserDirectory, SessionLimits, SessionRegistry,
};

pub const PASSWORD: &str = "Gantt#Ridge-Walrus-1987";

pub fn user(username: &str, password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: PasswordHasher::new().hash_password(password).unwrap(),
        first_name: "Ana".to_string(),
        last_name: "Ruiz".to_string(),
        is_active: true,
        is_staff: false,
        is_superuser: false,
        department: Some(UserDepartment::Med),
        other_department: None,
        employee_department: None,
        last_login: None,
        date_joined: Utc::now(),
    }
}

pub struct TestAuth {
    pub registry: SessionRegistry,
    pub store: MemorySessionStore,
    pub directory: MemoryUserDirectory,
    pub encoder: Arc<JwtEncoder>,
    pub user: User,
}

impl TestAuth {
    pub async fn new() -> Self {
        Self::with_limits(SessionLimits::default()).await
    }

    pub async fn with_limits(limits: SessionLimits) -> Self {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        };
        let store = MemorySessionStore::new();
        let directory = MemoryUserDirectory::new();
        let user = user("ana.ruiz", PASSWORD);
        directory.insert(user.clone()).await;

        let encoder = Arc::new(JwtEncoder::new(&config));
        let registry = SessionRegistry::new(
            Arc::new(store.clone()),
            Arc::new(directory.clone()),
            encoder.clone(),
            Arc::new(JwtDecoder::new(&config)),
            limits,
        );

        Self {
            registry,
            store,
            directory,
            encoder,
            user,
        }
    }

    pub async fn login(&self, now: DateTime<Utc>) -> LoginOutcome {
        self.registry
            .login(&self.user.username, PASSWORD, DeviceInfo::default(), now)
            .await
            .unwrap()
    }

    pub fn legacy_access_token(&self) -> String {
        let now = Utc::now();
        self.encoder
            .sign(&Claims {
                sub: self.user.id,
                session_id: None,
                username: self.user.username.clone(),
                email: self.user.email.clone(),
                first_name: String::new(),
                last_name: String::new(),
                iat: now.timestamp(),
                exp: (now + Duration::minutes(5)).timestamp(),
                jti: Uuid::new_v4(),
                token_type: TokenType::Access,
            })
            .unwrap()
    }
}
