//! Account administration. Every route here sits behind the editor guard.

use crate::error::AppError;
use crate::handlers::page::{flash_user_error, render, verify_form, PageContext};
use crate::middleware::flash;
use crate::models::user::{CreateUserForm, CurrentUser, User};
use crate::services::user_service::CreateUserRequest;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

const USERS_PAGE: &str = "/users";

#[derive(Template)]
#[template(path = "users.html")]
struct UsersTemplate {
    ctx: PageContext,
    users: Vec<User>,
}

#[derive(Deserialize)]
pub struct UserActionForm {
    #[serde(default)]
    csrf_token: String,
}

/// GET /users - List accounts
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, AppError> {
    let users = state.user_service.list_users().await?;

    let template = UsersTemplate {
        ctx: PageContext::load(&session, Some(user)).await,
        users,
    };
    Ok(render(&template))
}

/// POST /users - Create an account on someone's behalf
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = verify_form(&session, &form.csrf_token, USERS_PAGE).await {
        return Ok(redirect);
    }

    let Ok(role) = form.role() else {
        flash::error(&session, "Tipo de usuário inválido.").await;
        return Ok(Redirect::to(USERS_PAGE).into_response());
    };

    let request = CreateUserRequest {
        name: form.nome.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        password: form.senha.unwrap_or_default(),
        role,
    };

    match state.user_service.create_user(request).await {
        Ok(_) => flash::success(&session, "Usuário criado com sucesso.").await,
        Err(e) => flash_user_error(&session, e.into()).await?,
    }

    Ok(Redirect::to(USERS_PAGE).into_response())
}

/// POST /users/block/{id} - Forbid future logins
pub async fn block_user(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<UserActionForm>,
) -> Result<Response, AppError> {
    set_active(state, editor, session, id, form, false).await
}

/// POST /users/unblock/{id} - Allow logins again
pub async fn unblock_user(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<UserActionForm>,
) -> Result<Response, AppError> {
    set_active(state, editor, session, id, form, true).await
}

async fn set_active(
    state: AppState,
    editor: CurrentUser,
    session: Session,
    id: i64,
    form: UserActionForm,
    active: bool,
) -> Result<Response, AppError> {
    if let Err(redirect) = verify_form(&session, &form.csrf_token, USERS_PAGE).await {
        return Ok(redirect);
    }

    let user = state.user_service.set_active(id, active).await?;
    info!(editor_id = editor.id, user_id = user.id, active, "User status changed");

    let notice = if active {
        format!("Usuário {} desbloqueado.", user.name)
    } else {
        format!("Usuário {} bloqueado.", user.name)
    };
    flash::success(&session, notice).await;

    Ok(Redirect::to(USERS_PAGE).into_response())
}

/// POST /users/delete/{id} - Remove an account
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<UserActionForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = verify_form(&session, &form.csrf_token, USERS_PAGE).await {
        return Ok(redirect);
    }

    let user = state.user_service.delete_user(id).await?;
    info!(editor_id = editor.id, user_id = user.id, "User deleted");
    flash::success(&session, format!("Usuário {} excluído.", user.name)).await;

    Ok(Redirect::to(USERS_PAGE).into_response())
}
