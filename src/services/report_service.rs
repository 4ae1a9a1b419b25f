use crate::export::{self, ExportError, ExportFile, PDF_CONTENT_TYPE, XLSX_CONTENT_TYPE};
use crate::models::expense::{CategoryTotals, Expense, EXPENSE_CATEGORIES};
use crate::models::project::Project;
use crate::repositories::expense_repository::ExpenseRepository;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::user_repository::RepositoryError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Project not found")]
    ProjectNotFound,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Read-only views over stored expenses: chart totals and file exports.
pub struct ReportService {
    projects: Arc<dyn ProjectRepository>,
    expenses: Arc<dyn ExpenseRepository>,
}

impl ReportService {
    pub fn new(projects: Arc<dyn ProjectRepository>, expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { projects, expenses }
    }

    /// Totals for every label in `EXPENSE_CATEGORIES`, in that order. Matching
    /// is exact and case-sensitive; labels without expenses report `0.0`.
    pub async fn category_totals(&self) -> Result<CategoryTotals, ReportError> {
        let sums: HashMap<String, f64> = self.expenses.sum_by_category().await?.into_iter().collect();

        let labels = EXPENSE_CATEGORIES.iter().map(|c| c.to_string()).collect();
        let data = EXPENSE_CATEGORIES
            .iter()
            .map(|category| sums.get(*category).copied().unwrap_or(0.0))
            .collect();

        Ok(CategoryTotals { labels, data })
    }

    async fn load(&self, project_id: i64) -> Result<(Project, Vec<Expense>), ReportError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ReportError::ProjectNotFound)?;
        let expenses = self.expenses.list_for_project(project_id).await?;
        Ok((project, expenses))
    }

    pub async fn export_spreadsheet(&self, project_id: i64) -> Result<ExportFile, ReportError> {
        let (_, expenses) = self.load(project_id).await?;
        let bytes = export::spreadsheet::render(&expenses)?;
        debug!(project_id, rows = expenses.len(), "Rendered spreadsheet export");

        Ok(ExportFile {
            filename: format!("gastos_obra_{project_id}.xlsx"),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }

    pub async fn export_pdf(&self, project_id: i64) -> Result<ExportFile, ReportError> {
        let (project, expenses) = self.load(project_id).await?;
        let title = format!("Gastos - {}", project.name);
        let bytes = export::pdf::render(&title, &expenses)?;
        debug!(project_id, rows = expenses.len(), "Rendered PDF export");

        Ok(ExportFile {
            filename: format!("gastos_obra_{project_id}.pdf"),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }
}
