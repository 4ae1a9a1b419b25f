use crate::models::expense::{Expense, NewExpense};
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, expense: NewExpense) -> RepositoryResult<Expense>;
    /// Expenses of one project in insertion order.
    async fn list_for_project(&self, project_id: i64) -> RepositoryResult<Vec<Expense>>;
    /// Deletes an expense only if it belongs to `project_id`.
    async fn delete(&self, project_id: i64, expense_id: i64) -> RepositoryResult<()>;
    /// Sum of amounts grouped by exact category text, across all projects.
    async fn sum_by_category(&self) -> RepositoryResult<Vec<(String, f64)>>;
}

pub struct SqliteExpenseRepository {
    pool: SqlitePool,
}

impl SqliteExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const EXPENSE_COLUMNS: &str =
    "id, project_id, category, amount, expense_date, description, approver";

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepository {
    async fn create(&self, expense: NewExpense) -> RepositoryResult<Expense> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (project_id, category, amount, expense_date, description, approver)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.project_id)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(expense.expense_date)
        .bind(&expense.description)
        .bind(&expense.approver)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn list_for_project(&self, project_id: i64) -> RepositoryResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE project_id = ? ORDER BY id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    async fn delete(&self, project_id: i64, expense_id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND project_id = ?")
            .bind(expense_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn sum_by_category(&self) -> RepositoryResult<Vec<(String, f64)>> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            "SELECT category, CAST(SUM(amount) AS REAL) FROM expenses GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
