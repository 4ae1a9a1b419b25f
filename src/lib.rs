pub mod amount;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use chat::ChatHub;
use repositories::{SqliteExpenseRepository, SqliteProjectRepository, SqliteUserRepository};
use services::{AuthService, ExpenseService, ProjectService, ReportService, UserService};
use std::sync::Arc;

pub use routes::build_router;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub project_service: Arc<ProjectService>,
    pub expense_service: Arc<ExpenseService>,
    pub report_service: Arc<ReportService>,
    pub chat_hub: Arc<ChatHub>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite repositories into the services.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let project_repository = Arc::new(SqliteProjectRepository::new(pool.clone()));
        let expense_repository = Arc::new(SqliteExpenseRepository::new(pool.clone()));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository)),
            project_service: Arc::new(ProjectService::new(project_repository.clone())),
            expense_service: Arc::new(ExpenseService::new(
                project_repository.clone(),
                expense_repository.clone(),
            )),
            report_service: Arc::new(ReportService::new(project_repository, expense_repository)),
            chat_hub: Arc::new(ChatHub::new()),
            pool,
        }
    }
}
