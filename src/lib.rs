pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

use repositories::user_repository::{SqliteUserRepository, UserRepository};
use services::{auth_service::AuthService, user_service::UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository)),
        }
    }

    /// State backed by the SQLite user store on `pool`.
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        Self::new(Arc::new(SqliteUserRepository::new(pool)))
    }
}
