//! Department policy decisions made before any row is read or written.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use capacity_entity::department::UserDepartment;

use crate::helpers::TestApp;

fn employee_body(department: &str) -> serde_json::Value {
    json!({
        "name": "Luis Ortega",
        "role": "Designer",
        "department": department,
        "capacity": 40.0,
        "is_active": true,
        "is_subcontracted_material": false,
        "subcontract_company": null,
        "user_id": null,
    })
}

#[tokio::test]
async fn test_department_user_cannot_write_another_departments_employee() {
    let app = TestApp::new();
    app.create_user("med.lead", Some(UserDepartment::Med), None).await;
    let login = app.login("med.lead").await;

    let response = app
        .request("POST", "/api/employees/", Some(employee_body("HD")), Some(&login.access))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_user_without_department_is_read_only() {
    let app = TestApp::new();
    app.create_user("visitor", None, None).await;
    let login = app.login("visitor").await;

    let response = app
        .request("POST", "/api/employees/", Some(employee_body("MED")), Some(&login.access))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_hidden_projects_need_full_access() {
    let app = TestApp::new();
    app.create_user("med.lead", Some(UserDepartment::Med), None).await;
    let login = app.login("med.lead").await;

    let response = app
        .request(
            "GET",
            "/api/projects/?include_hidden=yes",
            None,
            Some(&login.access),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_project_create_without_scope_is_forbidden() {
    let app = TestApp::new();
    app.create_user("med.lead", Some(UserDepartment::Med), None).await;
    let login = app.login("med.lead").await;

    let response = app
        .request(
            "POST",
            "/api/projects/",
            Some(json!({ "name": "Line 4 retrofit", "client": "ACME" })),
            Some(&login.access),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_capacity_tables_need_full_access() {
    let app = TestApp::new();
    app.create_user("build.lead", Some(UserDepartment::Build), None).await;
    let login = app.login("build.lead").await;

    let response = app
        .request(
            "POST",
            "/api/scio-team-capacity/",
            Some(json!({
                "department": "BUILD",
                "week_start_date": "2025-03-03",
                "capacity": 120.0,
            })),
            Some(&login.access),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_budget_hours_need_full_access() {
    let app = TestApp::new();
    app.create_user("med.lead", Some(UserDepartment::Med), None).await;
    let login = app.login("med.lead").await;

    let response = app
        .request(
            "PATCH",
            "/api/project-budgets/update_budget_hours/",
            Some(json!({
                "project_id": Uuid::new_v4(),
                "department": "MED",
                "hours_utilized": 10.0,
            })),
            Some(&login.access),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_registered_users_need_business_intelligence() {
    let app = TestApp::new();
    app.create_user("pm.lead", Some(UserDepartment::Pm), None).await;
    let login = app.login("pm.lead").await;

    let response = app
        .request("GET", "/api/registered-users/", None, Some(&login.access))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(
        response.body["message"]
            .as_str()
            .is_some_and(|m| m.contains("business intelligence"))
    );
}
