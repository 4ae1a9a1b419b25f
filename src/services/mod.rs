pub mod auth_service;
pub mod bootstrap;
pub mod expense_service;
pub mod project_service;
pub mod report_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use expense_service::ExpenseService;
pub use project_service::ProjectService;
pub use report_service::ReportService;
pub use user_service::UserService;
