//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use capacity_auth::session::{PgSessionStore, PgUserDirectory};
use capacity_auth::{
    AccountManager, JwtDecoder, JwtEncoder, SessionLimits, SessionRegistry, SessionStore,
    UserDirectory,
};
use capacity_core::config::AppConfig;
use capacity_database::repositories::{
    ActivityLogRepository, AssignmentRepository, BudgetRepository, ChangeOrderRepository,
    EmployeeRepository, PrgExternalCapacityRepository, ProjectRepository, ScioCapacityRepository,
    SessionRepository, StageConfigRepository, SubcontractedCapacityRepository, UserRepository,
    WeeklyTotalRepository,
};
use capacity_service::{
    ActivityLogService, AssignmentService, BudgetService, ChangeOrderService, EmployeeService,
    PrgExternalCapacityService, ProjectService, RegisteredUserService, RegistrationService,
    ScioCapacityService, StageConfigService, SubcontractedCapacityService, WeeklyTotalService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// Session registry: login, sweep, activity, logout
    pub sessions: SessionRegistry,
    /// Principal lookup for the authenticated-user extractor
    pub directory: Arc<dyn UserDirectory>,
    /// Password change and reset
    pub accounts: AccountManager,

    // ── Services ─────────────────────────────────────────────
    /// Employee service
    pub employees: Arc<EmployeeService>,
    /// Project service
    pub projects: Arc<ProjectService>,
    /// Assignment service
    pub assignments: Arc<AssignmentService>,
    /// Change order service
    pub change_orders: Arc<ChangeOrderService>,
    /// Budget service
    pub budgets: Arc<BudgetService>,
    /// Stage configuration service
    pub stage_configs: Arc<StageConfigService>,
    /// SCIO capacity service
    pub scio_capacity: Arc<ScioCapacityService>,
    /// Subcontracted capacity service
    pub subcontracted_capacity: Arc<SubcontractedCapacityService>,
    /// PRG external capacity service
    pub prg_external_capacity: Arc<PrgExternalCapacityService>,
    /// Department weekly totals service
    pub weekly_totals: Arc<WeeklyTotalService>,
    /// Activity log service
    pub activity_logs: Arc<ActivityLogService>,
    /// Registration service
    pub registration: Arc<RegistrationService>,
    /// Registered-user administration
    pub registered_users: Arc<RegisteredUserService>,
}

impl AppState {
    /// State backed entirely by PostgreSQL.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let users = Arc::new(UserRepository::new(db_pool.clone()));
        let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(Arc::new(
            SessionRepository::new(db_pool.clone()),
        )));
        let directory: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(users));
        Self::with_auth_backends(config, db_pool, store, directory)
    }

    /// State with explicit session and user back ends. Entity services still use `db_pool`.
    pub fn with_auth_backends(
        config: AppConfig,
        db_pool: PgPool,
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        let sessions = SessionRegistry::new(
            store,
            Arc::clone(&directory),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
            SessionLimits::from_config(&config.session),
        );
        let accounts = AccountManager::new(Arc::clone(&directory), sessions.clone(), &config.auth);

        let users = Arc::new(UserRepository::new(db_pool.clone()));
        let employee_repo = Arc::new(EmployeeRepository::new(db_pool.clone()));
        let stage_repo = Arc::new(StageConfigRepository::new(db_pool.clone()));
        let budget_repo = Arc::new(BudgetRepository::new(db_pool.clone()));

        Self {
            employees: Arc::new(EmployeeService::new(Arc::clone(&employee_repo))),
            projects: Arc::new(ProjectService::new(Arc::new(ProjectRepository::new(
                db_pool.clone(),
            )))),
            assignments: Arc::new(AssignmentService::new(
                Arc::new(AssignmentRepository::new(db_pool.clone())),
                Arc::clone(&employee_repo),
            )),
            change_orders: Arc::new(ChangeOrderService::new(Arc::new(
                ChangeOrderRepository::new(db_pool.clone()),
            ))),
            budgets: Arc::new(BudgetService::new(budget_repo)),
            stage_configs: Arc::new(StageConfigService::new(stage_repo)),
            scio_capacity: Arc::new(ScioCapacityService::new(Arc::new(
                ScioCapacityRepository::new(db_pool.clone()),
            ))),
            subcontracted_capacity: Arc::new(SubcontractedCapacityService::new(Arc::new(
                SubcontractedCapacityRepository::new(db_pool.clone()),
            ))),
            prg_external_capacity: Arc::new(PrgExternalCapacityService::new(Arc::new(
                PrgExternalCapacityRepository::new(db_pool.clone()),
            ))),
            weekly_totals: Arc::new(WeeklyTotalService::new(Arc::new(
                WeeklyTotalRepository::new(db_pool.clone()),
            ))),
            activity_logs: Arc::new(ActivityLogService::new(Arc::new(
                ActivityLogRepository::new(db_pool.clone()),
            ))),
            registration: Arc::new(RegistrationService::new(
                Arc::clone(&users),
                employee_repo,
                &config.auth,
                config.registration.clone(),
            )),
            registered_users: Arc::new(RegisteredUserService::new(
                users,
                accounts.clone(),
                sessions.clone(),
            )),
            config: Arc::new(config),
            db_pool,
            sessions,
            directory,
            accounts,
        }
    }
}
