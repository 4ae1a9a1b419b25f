pub mod expense;
pub mod project;
pub mod user;

pub use expense::{
    CategoryTotals, CreateExpenseForm, Expense, NewExpense, EXPENSE_CATEGORIES,
};
pub use project::{CreateProjectForm, Project};
pub use user::{CreateUserForm, CurrentUser, Role, User};
