pub mod expense_repository;
pub mod project_repository;
pub mod user_repository;

pub use expense_repository::{ExpenseRepository, SqliteExpenseRepository};
pub use project_repository::{ProjectRepository, SqliteProjectRepository};
pub use user_repository::{RepositoryError, SqliteUserRepository, UserRepository};
