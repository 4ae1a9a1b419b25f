use crate::models::user::{Role, User};
use crate::repositories::user_repository::{NewUser, RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Name is required")]
    MissingName,
    #[error("Password is required")]
    MissingPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Creates an active account. Fails with `EmailTaken` without touching the
    /// existing account when the email is already registered.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        let email = request.email.trim();

        if name.is_empty() {
            return Err(UserServiceError::MissingName);
        }
        self.validate_email(email)?;
        if request.password.trim().is_empty() {
            return Err(UserServiceError::MissingPassword);
        }

        let password_hash = self.hash_password(&request.password)?;

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: request.role,
        };

        match self.repository.create_user(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, role = %user.role, "Created user");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email.trim()).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users().await?)
    }

    /// Blocks (`false`) or unblocks (`true`) an account. Existing sessions of
    /// the account are left alone; the flag is checked at login.
    pub async fn set_active(&self, id: i64, active: bool) -> Result<User, UserServiceError> {
        match self.repository.set_active(id, active).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(UserServiceError::UserNotFound),
            Err(e) => return Err(UserServiceError::RepositoryError(e)),
        }

        info!(user_id = id, active, "Changed user status");
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    /// Deletes an account and returns what it was.
    pub async fn delete_user(&self, id: i64) -> Result<User, UserServiceError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        match self.repository.delete_user(id).await {
            Ok(()) => {
                info!(user_id = id, "Deleted user");
                Ok(user)
            }
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if !email.contains('@') || email.len() > 255 || email.is_empty() {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}
