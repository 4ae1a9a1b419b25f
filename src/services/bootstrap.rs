use crate::config::AdminSeed;
use crate::models::user::Role;
use crate::services::user_service::{CreateUserRequest, UserService, UserServiceError};
use tracing::{info, warn};

/// Makes sure the configured administrator exists. Safe to run on every
/// start: an existing account with the same email is never modified.
///
/// Returns `true` when an account was created.
pub async fn ensure_default_admin(
    user_service: &UserService,
    seed: Option<&AdminSeed>,
) -> Result<bool, UserServiceError> {
    let Some(seed) = seed else {
        warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping administrator bootstrap");
        return Ok(false);
    };

    if user_service.find_user_by_email(&seed.email).await?.is_some() {
        info!(email = %seed.email, "Administrator account already present");
        return Ok(false);
    }

    let request = CreateUserRequest {
        name: seed.name.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
        role: Role::Editor,
    };

    match user_service.create_user(request).await {
        Ok(user) => {
            info!(user_id = user.id, "Seeded administrator account");
            Ok(true)
        }
        // Another process won the race; the account exists either way.
        Err(UserServiceError::EmailTaken) => Ok(false),
        Err(e) => Err(e),
    }
}
