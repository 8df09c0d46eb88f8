use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::services::{auth_service::AuthServiceError, user_service::UserServiceError};

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures surfaced by HTTP handlers.
///
/// Expected outcomes of the auth flow (duplicate signup, invalid input, bad
/// credentials, a session pointing at a deleted user) are handled in the
/// handlers with a flash and a redirect. Whatever reaches this type is a
/// storage, hashing or session failure and renders as a 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("User service error: {0}")]
    UserService(#[from] UserServiceError),

    #[error("Auth service error: {0}")]
    AuthService(#[from] AuthServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
            .into_response()
    }
}
