use crate::error::AppError;
use crate::handlers::page::{flash_user_error, render, verify_form, PageContext};
use crate::middleware::flash;
use crate::models::expense::{CreateExpenseForm, Expense, EXPENSE_CATEGORIES};
use crate::models::project::Project;
use crate::models::user::CurrentUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "expenses.html")]
struct ExpensesTemplate {
    ctx: PageContext,
    project: Project,
    expenses: Vec<Expense>,
    categories: &'static [&'static str],
    total: String,
}

/// Body of the delete form; only the token is submitted.
#[derive(Deserialize)]
pub struct DeleteExpenseForm {
    #[serde(default)]
    csrf_token: String,
}

fn project_page(project_id: i64) -> String {
    format!("/gastos/{project_id}")
}

/// GET /gastos/{obra_id} - A project's expenses and the entry form
pub async fn view_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(project_id): Path<i64>,
) -> Result<Response, AppError> {
    let (project, expenses) = state.expense_service.project_expenses(project_id).await?;
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let template = ExpensesTemplate {
        ctx: PageContext::load(&session, Some(user)).await,
        project,
        expenses,
        categories: &EXPENSE_CATEGORIES,
        total: format!("R$ {total:.2}"),
    };
    Ok(render(&template))
}

/// POST /gastos/add/{obra_id} - Validate and store an expense
pub async fn add_expense(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i64>,
    Form(form): Form<CreateExpenseForm>,
) -> Result<Response, AppError> {
    let back = project_page(project_id);
    if let Err(redirect) = verify_form(&session, &form.csrf_token, &back).await {
        return Ok(redirect);
    }

    match state
        .expense_service
        .add_expense(project_id, form.into())
        .await
    {
        Ok(_) => flash::success(&session, "Gasto adicionado.").await,
        Err(e) => flash_user_error(&session, e.into()).await?,
    }

    Ok(Redirect::to(&back).into_response())
}

/// POST /gastos/delete/{obra_id}/{gasto_id} - Remove one expense of a project
pub async fn delete_expense(
    State(state): State<AppState>,
    session: Session,
    Path((project_id, expense_id)): Path<(i64, i64)>,
    Form(form): Form<DeleteExpenseForm>,
) -> Result<Response, AppError> {
    let back = project_page(project_id);
    if let Err(redirect) = verify_form(&session, &form.csrf_token, &back).await {
        return Ok(redirect);
    }

    state
        .expense_service
        .delete_expense(project_id, expense_id)
        .await?;
    flash::success(&session, "Gasto removido.").await;

    Ok(Redirect::to(&back).into_response())
}
