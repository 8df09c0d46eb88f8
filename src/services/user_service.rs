use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::password;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your name")]
    InvalidName,
    #[error("Please enter a password")]
    MissingPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error("Email address already exists")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl UserServiceError {
    /// Errors caused by the submitted input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UserServiceError::InvalidEmail
                | UserServiceError::InvalidName
                | UserServiceError::MissingPassword
                | UserServiceError::PasswordMismatch
        )
    }
}

pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_confirm: Option<String>,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
    pub new_password_confirm: Option<String>,
}

const MAX_FIELD_LEN: usize = 255;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a new account. The email must be unused; the password is
    /// stored only as an Argon2 hash.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let email = request.email.trim();
        let name = request.name.trim();

        self.validate_email(email)?;
        self.validate_name(name)?;

        if let Some(ref confirm) = request.password_confirm {
            if request.password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        self.validate_password(&request.password)?;

        let password_hash = password::hash_password(&request.password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        match self.repository.create_user(email, name, &password_hash).await {
            Ok(user) => {
                info!(user_id = user.id, "Created user account");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => {
                debug!("Signup rejected: email already registered");
                Err(UserServiceError::EmailTaken)
            }
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email.trim()).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        if let Some(ref confirm) = request.new_password_confirm {
            if request.new_password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        self.validate_password(&request.new_password)?;

        let password_hash = password::hash_password(&request.new_password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        match self
            .repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if email.is_empty() || !email.contains('@') || email.len() > MAX_FIELD_LEN {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_name(&self, name: &str) -> Result<(), UserServiceError> {
        if name.is_empty() || name.len() > MAX_FIELD_LEN {
            return Err(UserServiceError::InvalidName);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.is_empty() {
            return Err(UserServiceError::MissingPassword);
        }
        Ok(())
    }
}
