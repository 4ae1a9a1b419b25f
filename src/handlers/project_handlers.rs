use crate::error::AppError;
use crate::handlers::page::{render, verify_form, PageContext};
use crate::middleware::flash;
use crate::models::project::{CreateProjectForm, Project};
use crate::models::user::CurrentUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Extension, Form, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "projects.html")]
struct ProjectsTemplate {
    ctx: PageContext,
    projects: Vec<Project>,
}

/// GET / - List every project
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, AppError> {
    let projects = state.project_service.list_projects().await?;

    let template = ProjectsTemplate {
        ctx: PageContext::load(&session, Some(user)).await,
        projects,
    };
    Ok(render(&template))
}

/// POST /obras/add - Create a project; a blank name is ignored
pub async fn add_project(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CreateProjectForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = verify_form(&session, &form.csrf_token, "/").await {
        return Ok(redirect);
    }

    let name = form.nome.unwrap_or_default();
    if state.project_service.create_project(&name).await?.is_some() {
        flash::success(&session, "Obra adicionada.").await;
    }

    Ok(Redirect::to("/").into_response())
}
