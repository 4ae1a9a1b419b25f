use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A construction site ("obra"). Expenses hang off it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectForm {
    pub nome: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}
