use crate::amount::{parse_amount, AmountParseError};
use crate::models::expense::{CreateExpenseForm, Expense, NewExpense};
use crate::models::project::Project;
use crate::repositories::expense_repository::ExpenseRepository;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::user_repository::RepositoryError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum ExpenseServiceError {
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Expense not found")]
    ExpenseNotFound,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    InvalidAmount(#[from] AmountParseError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Expense input with every field still as submitted.
#[derive(Debug, Clone, Default)]
pub struct CreateExpenseRequest {
    pub category: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub approver: Option<String>,
}

impl From<CreateExpenseForm> for CreateExpenseRequest {
    fn from(form: CreateExpenseForm) -> Self {
        CreateExpenseRequest {
            category: form.tipo_nota,
            amount: form.valor,
            date: form.data_nota,
            description: form.descricao,
            approver: form.aprovador,
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ExpenseServiceError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ExpenseServiceError::MissingField(field))
}

pub fn parse_expense_date(raw: &str) -> Result<NaiveDate, ExpenseServiceError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ExpenseServiceError::InvalidDate(raw.to_string()))
}

impl CreateExpenseRequest {
    /// Checks presence first, then parses date and amount.
    pub fn validate(self, project_id: i64) -> Result<NewExpense, ExpenseServiceError> {
        let category = required(self.category, "tipo_nota")?;
        let raw_amount = required(self.amount, "valor")?;
        let raw_date = required(self.date, "data_nota")?;
        let approver = required(self.approver, "aprovador")?;

        let expense_date = parse_expense_date(&raw_date)?;
        let amount = parse_amount(&raw_amount)?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewExpense {
            project_id,
            category,
            amount,
            expense_date,
            description,
            approver,
        })
    }
}

pub struct ExpenseService {
    projects: Arc<dyn ProjectRepository>,
    expenses: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    pub fn new(projects: Arc<dyn ProjectRepository>, expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { projects, expenses }
    }

    async fn require_project(&self, project_id: i64) -> Result<Project, ExpenseServiceError> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(ExpenseServiceError::ProjectNotFound)
    }

    /// The project together with its expenses in insertion order.
    pub async fn project_expenses(
        &self,
        project_id: i64,
    ) -> Result<(Project, Vec<Expense>), ExpenseServiceError> {
        let project = self.require_project(project_id).await?;
        let expenses = self.expenses.list_for_project(project_id).await?;
        Ok((project, expenses))
    }

    pub async fn add_expense(
        &self,
        project_id: i64,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ExpenseServiceError> {
        self.require_project(project_id).await?;
        let new_expense = request.validate(project_id)?;

        let expense = self.expenses.create(new_expense).await?;
        info!(
            project_id,
            expense_id = expense.id,
            category = %expense.category,
            "Recorded expense"
        );
        Ok(expense)
    }

    pub async fn delete_expense(
        &self,
        project_id: i64,
        expense_id: i64,
    ) -> Result<(), ExpenseServiceError> {
        match self.expenses.delete(project_id, expense_id).await {
            Ok(()) => {
                info!(project_id, expense_id, "Deleted expense");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ExpenseServiceError::ExpenseNotFound),
            Err(e) => Err(ExpenseServiceError::RepositoryError(e)),
        }
    }
}
