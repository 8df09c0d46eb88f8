pub mod auth_service;
pub mod password;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use user_service::{CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceError};
