//! Binary renderings of a project's expense list.
//!
//! Both formats share the same column layout and row order; only the
//! encoding differs.

pub mod pdf;
pub mod spreadsheet;

use crate::models::expense::Expense;

pub const COLUMN_HEADERS: [&str; 5] = ["Data", "Tipo", "Valor", "Aprovador", "Descrição"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// A rendered document ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One expense flattened to display text, in column order.
pub(crate) fn text_row(expense: &Expense) -> [String; 5] {
    [
        expense.expense_date.format("%Y-%m-%d").to_string(),
        expense.category.clone(),
        expense.amount_display(),
        expense.approver.clone(),
        expense.description_display().to_string(),
    ]
}
