use crate::repositories::user_repository::RepositoryError;
use crate::services::{
    auth_service::AuthServiceError, expense_service::ExpenseServiceError,
    project_service::ProjectServiceError, report_service::ReportError,
    user_service::UserServiceError,
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    Auth,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    DateParse(String),

    #[error("Invalid amount: {0}")]
    ValueParse(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errors the user can fix by resubmitting a form. Handlers turn these
    /// into a flash notice and a redirect instead of an error page.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Auth
                | AppError::DuplicateEmail
                | AppError::Validation(_)
                | AppError::DateParse(_)
                | AppError::ValueParse(_)
        )
    }

    /// Text shown in a flash notice.
    pub fn notice(&self) -> String {
        match self {
            AppError::DateParse(_) => "Data inválida. Use o formato AAAA-MM-DD.".to_string(),
            AppError::ValueParse(_) => "Valor inválido.".to_string(),
            AppError::DuplicateEmail => "E-mail já cadastrado.".to_string(),
            AppError::Auth => "Login inválido.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::NotFound => AppError::NotFound("Record"),
            RepositoryError::AlreadyExists => AppError::Validation("Record already exists".into()),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::EmailTaken => AppError::DuplicateEmail,
            UserServiceError::UserNotFound => AppError::NotFound("User"),
            UserServiceError::InvalidEmail => AppError::Validation("E-mail inválido.".into()),
            UserServiceError::MissingName => AppError::Validation("Informe o nome.".into()),
            UserServiceError::MissingPassword => AppError::Validation("Informe a senha.".into()),
            UserServiceError::HashingError(msg) => AppError::Internal(msg),
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::Auth,
            AuthServiceError::UserNotFound => AppError::NotFound("User"),
            AuthServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ProjectServiceError> for AppError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ExpenseServiceError> for AppError {
    fn from(err: ExpenseServiceError) -> Self {
        match err {
            ExpenseServiceError::ProjectNotFound => AppError::NotFound("Project"),
            ExpenseServiceError::ExpenseNotFound => AppError::NotFound("Expense"),
            ExpenseServiceError::MissingField(field) => {
                AppError::Validation(format!("Campo obrigatório: {field}"))
            }
            ExpenseServiceError::InvalidDate(raw) => AppError::DateParse(raw),
            ExpenseServiceError::InvalidAmount(e) => AppError::ValueParse(e.input),
            ExpenseServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::ProjectNotFound => AppError::NotFound("Project"),
            ReportError::Export(e) => AppError::Internal(e.to_string()),
            ReportError::RepositoryError(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth => (StatusCode::UNAUTHORIZED, self.notice()),
            AppError::DuplicateEmail => (StatusCode::CONFLICT, self.notice()),
            AppError::Validation(_) | AppError::DateParse(_) | AppError::ValueParse(_) => {
                (StatusCode::BAD_REQUEST, self.notice())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = format!(
            "<html><body><h1>{}</h1><p>{}</p><a href=\"/\">Voltar</a></body></html>",
            status.as_u16(),
            escape_html(&message)
        );
        (status, Html(body)).into_response()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
