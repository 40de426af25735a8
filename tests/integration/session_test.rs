//! Device cap, per-session logout, inactivity expiry.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use capacity_entity::department::UserDepartment;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_third_login_is_rejected_at_the_cap() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    app.login("ana.ruiz").await;
    app.login("ana.ruiz").await;

    let third = app.login_attempt("ana.ruiz", PASSWORD).await;

    assert_eq!(third.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(third.body["error"], "TOO_MANY_SESSIONS");
    assert!(
        third.body["message"]
            .as_str()
            .is_some_and(|m| m.contains("log out of another device"))
    );
    assert!(third.body.get("access").is_none());
}

#[tokio::test]
async fn test_logout_closes_only_the_callers_session() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let laptop = app.login("ana.ruiz").await;
    let phone = app.login("ana.ruiz").await;

    let response = app
        .request("POST", "/api/logout/", None, Some(&laptop.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sessions_closed"], 1);

    let laptop_status = app
        .request("GET", "/api/session-status/", None, Some(&laptop.access))
        .await;
    assert_eq!(laptop_status.status, StatusCode::UNAUTHORIZED);
    assert_eq!(laptop_status.body["status"], "inactive");

    let phone_status = app
        .request("GET", "/api/session-status/", None, Some(&phone.access))
        .await;
    assert_eq!(phone_status.status, StatusCode::OK);
    assert_eq!(phone_status.body["status"], "active");
    assert_eq!(phone_status.body["session_id"], phone.session_id.to_string());

    let protected = app
        .request("GET", "/api/employees/", None, Some(&laptop.access))
        .await;
    assert_eq!(protected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_frees_a_slot_under_the_cap() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let first = app.login("ana.ruiz").await;
    app.login("ana.ruiz").await;

    let logout = app
        .request(
            "POST",
            "/api/logout/",
            Some(json!({ "refresh": first.refresh })),
            Some(&first.access),
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let again = app.login_attempt("ana.ruiz", PASSWORD).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_idle_session_is_swept_on_status_check() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let login = app.login("ana.ruiz").await;

    assert!(
        app.store
            .set_last_activity(login.session_id, Utc::now() - Duration::minutes(21))
            .await
    );

    let status = app
        .request("GET", "/api/session-status/", None, Some(&login.access))
        .await;
    assert_eq!(status.status, StatusCode::UNAUTHORIZED);
    assert_eq!(status.body["status"], "inactive");
}

#[tokio::test]
async fn test_swept_session_frees_a_slot() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let stale = app.login("ana.ruiz").await;
    app.login("ana.ruiz").await;

    app.store
        .set_last_activity(stale.session_id, Utc::now() - Duration::minutes(30))
        .await;

    // The next tracked request runs the sweep before the login is attempted.
    app.request("GET", "/api/health/", None, None).await;
    let again = app.login_attempt("ana.ruiz", PASSWORD).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_recent_activity_keeps_the_session_alive() {
    let app = TestApp::new();
    app.create_user("ana.ruiz", Some(UserDepartment::Med), None).await;
    let login = app.login("ana.ruiz").await;

    app.store
        .set_last_activity(login.session_id, Utc::now() - Duration::minutes(19))
        .await;
    // A tracked request refreshes last_activity.
    app.request("GET", "/api/health/", None, Some(&login.access))
        .await;

    let status = app
        .request("GET", "/api/session-status/", None, Some(&login.access))
        .await;
    assert_eq!(status.status, StatusCode::OK);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/projects/", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
