use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub project_id: i64,
    pub category: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub approver: String,
}

impl Expense {
    /// Amount formatted the way the expense table and PDF show it.
    pub fn amount_display(&self) -> String {
        format!("R$ {:.2}", self.amount)
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Raw expense form. Every field is optional here so that a missing field
/// surfaces as a validation notice instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseForm {
    pub tipo_nota: Option<String>,
    pub valor: Option<String>,
    pub data_nota: Option<String>,
    pub descricao: Option<String>,
    pub aprovador: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

/// Validated expense ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub project_id: i64,
    pub category: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub approver: String,
}

/// Suggested categories. Category totals are computed over exactly this list.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Alimentação",
    "Aluguel de imoveis",
    "Locação de carro",
    "VR",
    "Gás de solda",
    "Salário mensal",
    "Locação de andaimes",
    "Locação de PTAs",
    "Locações de equipamentos",
    "Transporte de colaborador",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}
