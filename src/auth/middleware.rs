use crate::auth::SESSION_USER_KEY;
use crate::models::user::{CurrentUser, Role};
use crate::services::auth_service::AuthServiceError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{debug, error};

/// Resolves the session's user and exposes it to handlers as a
/// `CurrentUser` extension. Requests without a session go to `/login`.
///
/// The account's `active` flag is not consulted here: blocking a user takes
/// effect at their next login.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match session.get::<i64>(SESSION_USER_KEY).await {
        Ok(Some(id)) => id,
        _ => return Redirect::to("/login").into_response(),
    };

    match state.auth_service.get_user_by_id(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser::from(&user));
            next.run(request).await
        }
        Err(AuthServiceError::UserNotFound) => {
            debug!(user_id, "Session refers to a deleted user");
            let _ = session.flush().await;
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            error!("Failed to load session user: {}", e);
            crate::error::AppError::Internal(e.to_string()).into_response()
        }
    }
}

/// Lets the request through only when the current user holds `required`.
/// Anyone else is sent back to the project list without a notice.
///
/// Must be layered inside `require_auth`.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Response {
    let permitted = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.role.permits(required))
        .unwrap_or(false);

    if permitted {
        next.run(request).await
    } else {
        debug!(required = %required, path = %request.uri().path(), "Role check failed");
        Redirect::to("/").into_response()
    }
}

pub async fn redirect_if_authenticated(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(SESSION_USER_KEY).await {
        Redirect::to("/").into_response()
    } else {
        next.run(request).await
    }
}
