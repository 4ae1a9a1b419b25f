//! Pieces shared by every HTML page: layout context, rendering and the
//! form-submission boilerplate (CSRF check, flash-and-redirect on user errors).

use crate::error::AppError;
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::middleware::flash::{self, FlashMessage};
use crate::models::user::CurrentUser;
use askama::Template;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::{debug, warn};

const STALE_FORM_NOTICE: &str = "Formulário expirado. Tente novamente.";

/// Data the base layout needs on every page.
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<FlashMessage>,
    pub csrf_token: String,
}

impl PageContext {
    /// Drains pending flash notices, so build it only for a page that is
    /// about to be rendered.
    pub async fn load(session: &Session, user: Option<CurrentUser>) -> Self {
        let csrf_token = get_or_create_csrf_token(session)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to issue CSRF token: {}", e);
                String::new()
            });

        Self {
            user,
            flashes: flash::take(session).await,
            csrf_token,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.name.as_str())
    }

    pub fn is_editor(&self) -> bool {
        self.user
            .as_ref()
            .map(|user| user.role.is_editor())
            .unwrap_or(false)
    }
}

pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Internal(format!("Template error: {e}")).into_response(),
    }
}

/// Validates a submitted form token. On failure the user is sent back to
/// `back` with a notice.
pub async fn verify_form(session: &Session, token: &str, back: &str) -> Result<(), Response> {
    match validate_csrf_form_field(session, token).await {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!("Rejected form submission: {}", e);
            flash::error(session, STALE_FORM_NOTICE).await;
            Err(Redirect::to(back).into_response())
        }
    }
}

/// Turns an error the user can fix into a flash notice. Anything else is
/// returned for the error page.
pub async fn flash_user_error(session: &Session, err: AppError) -> Result<(), AppError> {
    if err.is_user_error() {
        flash::error(session, err.notice()).await;
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_context_consumes_flashes() {
        let session = session();
        flash::success(&session, "Obra adicionada.").await;

        let ctx = PageContext::load(&session, None).await;
        assert_eq!(ctx.flashes.len(), 1);
        assert!(!ctx.csrf_token.is_empty());
        assert!(!ctx.is_editor());

        let again = PageContext::load(&session, None).await;
        assert!(again.flashes.is_empty());
        assert_eq!(again.csrf_token, ctx.csrf_token);
    }

    #[tokio::test]
    async fn test_context_exposes_role() {
        let session = session();
        let user = CurrentUser {
            id: 1,
            name: "Ana".into(),
            role: Role::Editor,
        };

        let ctx = PageContext::load(&session, Some(user)).await;
        assert!(ctx.is_editor());
        assert_eq!(ctx.user_name(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_verify_form_rejects_wrong_token() {
        let session = session();
        get_or_create_csrf_token(&session).await.unwrap();

        let rejected = verify_form(&session, "forged", "/").await;
        assert!(rejected.is_err());
        assert_eq!(flash::take(&session).await.len(), 1);
    }

    #[tokio::test]
    async fn test_flash_user_error_passes_through_server_errors() {
        let session = session();

        assert!(flash_user_error(&session, AppError::Validation("x".into()))
            .await
            .is_ok());
        assert!(flash_user_error(&session, AppError::NotFound("Project"))
            .await
            .is_err());
    }
}
