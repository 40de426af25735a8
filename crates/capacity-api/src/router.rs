//! Route definitions for the capacity planner HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.

use axum::{
    Router,
    routing::{get, patch, post},
};

use capacity_database::repositories::{
    PrgExternalCapacityRepository, ScioCapacityRepository, SubcontractedCapacityRepository,
    WeeklyTotalRepository,
};

use crate::handlers;
use crate::handlers::capacity::{self as capacity, CapacityEndpoint};
use crate::state::AppState;

/// Build the `/api` router. Middleware is added by [`crate::app::build_app`].
pub fn build_router() -> Router<AppState> {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(employee_routes())
        .merge(project_routes())
        .merge(assignment_routes())
        .merge(project_child_routes())
        .merge(capacity_table::<ScioCapacityRepository>("/scio-team-capacity"))
        .merge(capacity_table::<SubcontractedCapacityRepository>(
            "/subcontracted-team-capacity",
        ))
        .merge(capacity_table::<PrgExternalCapacityRepository>(
            "/prg-external-team-capacity",
        ))
        .merge(capacity_table::<WeeklyTotalRepository>("/department-weekly-total"))
        .merge(activity_routes())
        .merge(registered_user_routes())
        .route("/health/", get(handlers::health::health_check));

    Router::new().nest("/api", api_routes)
}

/// Login, refresh, registration, session status, logout, password change
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token/", post(handlers::auth::login))
        .route("/token/refresh/", post(handlers::auth::refresh))
        .route("/register/", post(handlers::register::register))
        .route("/verify-email/", post(handlers::auth::verification_unavailable))
        .route("/verify-code/", post(handlers::auth::verification_unavailable))
        .route("/session-status/", get(handlers::auth::session_status))
        .route("/logout/", post(handlers::auth::logout))
        .route("/change-password/", post(handlers::auth::change_password))
}

fn employee_routes() -> Router<AppState> {
    use handlers::employee::*;
    Router::new()
        .route("/employees/", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}/",
            get(get_employee)
                .put(update_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
}

fn project_routes() -> Router<AppState> {
    use handlers::project::*;
    Router::new()
        .route("/projects/", get(list_projects).post(create_project))
        .route(
            "/projects/{id}/",
            get(get_project)
                .put(update_project)
                .patch(update_project)
                .delete(delete_project),
        )
}

fn assignment_routes() -> Router<AppState> {
    use handlers::assignment::*;
    Router::new()
        .route("/assignments/", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/{id}/",
            get(get_assignment)
                .put(update_assignment)
                .patch(update_assignment)
                .delete(delete_assignment),
        )
}

/// Change orders, budgets and department stages
fn project_child_routes() -> Router<AppState> {
    use handlers::{budget, change_order, stage_config};
    Router::new()
        .route(
            "/project-change-orders/",
            get(change_order::list_change_orders).post(change_order::create_change_order),
        )
        .route(
            "/project-change-orders/{id}/",
            get(change_order::get_change_order)
                .put(change_order::update_change_order)
                .patch(change_order::update_change_order)
                .delete(change_order::delete_change_order),
        )
        .route(
            "/project-budgets/",
            get(budget::list_budgets).post(budget::create_budget),
        )
        .route(
            "/project-budgets/update_budget_hours/",
            patch(budget::update_budget_hours),
        )
        .route(
            "/project-budgets/{id}/",
            get(budget::get_budget)
                .put(budget::update_budget)
                .patch(budget::update_budget)
                .delete(budget::delete_budget),
        )
        .route(
            "/department-stages/",
            get(stage_config::list_stage_configs).post(stage_config::create_stage_config),
        )
        .route(
            "/department-stages/{id}/",
            get(stage_config::get_stage_config)
                .put(stage_config::update_stage_config)
                .patch(stage_config::update_stage_config)
                .delete(stage_config::delete_stage_config),
        )
}

/// CRUD for one weekly capacity table under `base`
fn capacity_table<T: CapacityEndpoint>(base: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{base}/"),
            get(capacity::list_rows::<T>).post(capacity::create_row::<T>),
        )
        .route(
            &format!("{base}/{{id}}/"),
            get(capacity::get_row::<T>)
                .put(capacity::update_row::<T>)
                .patch(capacity::update_row::<T>)
                .delete(capacity::delete_row::<T>),
        )
}

fn activity_routes() -> Router<AppState> {
    use handlers::activity::*;
    Router::new()
        .route("/activity-logs/", get(list_activity).post(record_activity))
        .route("/activity-logs/{id}/", get(get_activity))
}

/// Business intelligence user administration
fn registered_user_routes() -> Router<AppState> {
    use handlers::registered_user::*;
    Router::new()
        .route("/registered-users/", get(list_registered_users))
        .route(
            "/registered-users/{id}/",
            get(get_registered_user)
                .put(update_registered_user)
                .patch(update_registered_user)
                .delete(delete_registered_user),
        )
        .route(
            "/registered-users/{id}/reset-password/",
            post(reset_password),
        )
}
