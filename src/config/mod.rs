pub mod server;
pub mod session;

pub use server::ServerConfig;
pub use session::{validate_production_config, SessionConfig, SessionLayer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("Invalid HOST value: {0}")]
    InvalidHost(String),
    #[error("Production environment requires HTTPS. Set FORCE_HTTPS=true")]
    HttpsRequired,
    #[error("SESSION_SECRET must be set in production")]
    MissingSessionSecret,
    #[error("SESSION_SECRET must be at least 64 bytes in production")]
    SessionSecretTooShort,
    #[error("SESSION_SECRET appears to be a default value. Generate a secure secret!")]
    DefaultSessionSecret,
}
