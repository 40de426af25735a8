//! Login, refresh, registration and password flows.

use axum::http::StatusCode;
use serde_json::json;

use capacity_entity::department::UserDepartment;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_login_returns_tokens_bound_to_a_session() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;

    let response = app.login_attempt("ana.ruiz", PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["access"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(response.body["refresh"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(response.body["session_id"].is_string());
    assert_eq!(response.body["user"]["username"], "ana.ruiz");
    assert!(response.body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;

    let response = app.login_attempt("ana.ruiz", "not-the-password").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let app = TestApp::new();

    let response = app.login_attempt("", "").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_refresh_rotates_the_refresh_token() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let login = app.login("ana.ruiz").await;

    let first = app
        .request(
            "POST",
            "/api/token/refresh/",
            Some(json!({ "refresh": login.refresh })),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body["access"].is_string());

    let replay = app
        .request(
            "POST",
            "/api/token/refresh/",
            Some(json!({ "refresh": login.refresh })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_ends_every_session() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let first = app.login("ana.ruiz").await;
    let second = app.login("ana.ruiz").await;

    let response = app
        .request(
            "POST",
            "/api/change-password/",
            Some(json!({
                "current_password": PASSWORD,
                "new_password": "Harbor#Lantern-2025",
                "confirm_password": "Harbor#Lantern-2025",
            })),
            Some(&first.access),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    for token in [&first.access, &second.access] {
        let status = app
            .request("GET", "/api/session-status/", None, Some(token))
            .await;
        assert_eq!(status.status, StatusCode::UNAUTHORIZED);
    }

    let relogin = app.login_attempt("ana.ruiz", "Harbor#Lantern-2025").await;
    assert_eq!(relogin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_with_wrong_current_password() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let login = app.login("ana.ruiz").await;

    let response = app
        .request(
            "POST",
            "/api/change-password/",
            Some(json!({
                "current_password": "wrong-password",
                "new_password": "Harbor#Lantern-2025",
                "confirm_password": "Harbor#Lantern-2025",
            })),
            Some(&login.access),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let still_active = app
        .request("GET", "/api/session-status/", None, Some(&login.access))
        .await;
    assert_eq!(still_active.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/register/",
            Some(json!({
                "email": "new.engineer@example.com",
                "password": "Harbor#Lantern-2025",
                "confirm_password": "Harbor#Lantern-2026",
                "first_name": "New",
                "last_name": "Engineer",
                "department": "MED",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_register_requires_other_department_for_other() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/register/",
            Some(json!({
                "email": "analyst@example.com",
                "password": "Harbor#Lantern-2025",
                "confirm_password": "Harbor#Lantern-2025",
                "first_name": "Data",
                "last_name": "Analyst",
                "department": "OTHER",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_verification_is_not_available() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/verify-email/", Some(json!({})), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_answers_without_a_database() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health/", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["database"], false);
}
