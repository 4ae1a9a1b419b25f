use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};
use uuid::Uuid;

pub const CSRF_TOKEN_KEY: &str = "csrf_token";
/// Tokens older than this are rejected and replaced.
const CSRF_TOKEN_TTL_SECS: i64 = 86_400;

/// CSRF Token structure for session storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    pub value: String,
    pub created_at: i64,
}

impl CsrfToken {
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let age = chrono::Utc::now().timestamp() - self.created_at;
        age > CSRF_TOKEN_TTL_SECS
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CsrfError {
    #[error("No CSRF token in session")]
    Missing,
    #[error("CSRF token expired")]
    Expired,
    #[error("CSRF token mismatch")]
    Mismatch,
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// First characters of a token, safe for logs.
fn prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

/// Generate a new CSRF token and store in session
pub async fn generate_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token = CsrfToken::new();
    let value = token.value.clone();

    session.insert(CSRF_TOKEN_KEY, token).await?;

    debug!("Generated new CSRF token: {}", prefix(&value));
    Ok(value)
}

/// Get or create a CSRF token for the session
pub async fn get_or_create_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await?;

    match token {
        Some(existing_token) if !existing_token.is_expired() => Ok(existing_token.value),
        _ => generate_csrf_token(session).await,
    }
}

/// Checks the token submitted with a form against the session and rotates it
/// on success, so a captured form cannot be replayed.
pub async fn validate_csrf_form_field(session: &Session, form_token: &str) -> Result<(), CsrfError> {
    let stored_token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await?;

    let stored_token = match stored_token {
        Some(token) if token.is_expired() => {
            warn!("CSRF token expired during form validation");
            return Err(CsrfError::Expired);
        }
        Some(token) => token,
        None => {
            warn!("No CSRF token in session for form validation");
            return Err(CsrfError::Missing);
        }
    };

    if form_token != stored_token.value {
        warn!(
            "CSRF form token mismatch: expected {}, got {}",
            prefix(&stored_token.value),
            prefix(form_token)
        );
        return Err(CsrfError::Mismatch);
    }

    generate_csrf_token(session).await?;
    Ok(())
}
