use crate::auth::SESSION_USER_KEY;
use crate::error::AppError;
use crate::handlers::page::{flash_user_error, render, verify_form, PageContext};
use crate::middleware::csrf::validate_csrf_form_field;
use crate::middleware::flash;
use crate::models::user::CreateUserForm;
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::CreateUserRequest,
};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info};

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    ctx: PageContext,
    error: Option<String>,
    email: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    ctx: PageContext,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: Option<String>,
    senha: Option<String>,
    #[serde(default)]
    csrf_token: String,
}

/// GET /login - Display the login form
pub async fn login_page(session: Session) -> Response {
    login_form(&session, None, String::new()).await
}

async fn login_form(session: &Session, error: Option<String>, email: String) -> Response {
    let template = LoginTemplate {
        ctx: PageContext::load(session, None).await,
        error,
        email,
    };
    render(&template)
}

/// POST /login - Verify credentials and open a session
pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.unwrap_or_default();

    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return login_form(
            &session,
            Some("Formulário expirado. Tente novamente.".to_string()),
            email,
        )
        .await;
    }

    let request = LoginRequest {
        email: email.clone(),
        password: form.senha.unwrap_or_default(),
    };

    match app_state.auth_service.authenticate(request).await {
        Ok(user) => {
            // Fresh session id at login
            if let Err(e) = session.cycle_id().await {
                error!("Failed to rotate session id: {}", e);
                return AppError::Internal(e.to_string()).into_response();
            }
            if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
                error!("Failed to store session user: {}", e);
                return AppError::Internal(e.to_string()).into_response();
            }

            info!(user_id = user.id, "User logged in");
            Redirect::to("/").into_response()
        }
        Err(AuthServiceError::InvalidCredentials) => {
            login_form(&session, Some(AppError::Auth.notice()), email).await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// GET /register - Display the sign-up form
pub async fn register_page(session: Session) -> Response {
    let template = RegisterTemplate {
        ctx: PageContext::load(&session, None).await,
    };
    render(&template)
}

/// POST /register - Create an account and send the user to the login page
pub async fn register_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = verify_form(&session, &form.csrf_token, "/register").await {
        return Ok(redirect);
    }

    let role = match form.role() {
        Ok(role) => role,
        Err(_) => {
            flash::error(&session, "Tipo de usuário inválido.").await;
            return Ok(Redirect::to("/register").into_response());
        }
    };

    let request = CreateUserRequest {
        name: form.nome.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        password: form.senha.unwrap_or_default(),
        role,
    };

    match app_state.user_service.create_user(request).await {
        Ok(_) => {
            flash::success(&session, "Cadastro realizado com sucesso. Faça o login.").await;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            flash_user_error(&session, e.into()).await?;
            Ok(Redirect::to("/register").into_response())
        }
    }
}

/// GET /logout - Drop the session
pub async fn logout_handler(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Redirect::to("/login")
}
