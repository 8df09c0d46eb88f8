//! Cookie policy for the authgate login session.
//!
//! The session cookie is the only thing that marks a browser as signed in, so
//! its attributes follow the deployment: production pins it to HTTPS with the
//! `__Host-` prefix and `SameSite=Strict`, development keeps it usable over
//! plain `http://localhost`. Cookies are always signed with a key derived from
//! `SESSION_SECRET`.

use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::warn;

use super::ConfigError;

/// Session layer stored in the SQLite `sessions` table with signed cookies.
pub type SessionLayer = SessionManagerLayer<SqliteStore, SignedCookie>;

/// Signing keys are 64 bytes; shorter secrets are stretched.
const KEY_BYTES: usize = 64;

/// Attributes of the login session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Inactivity window after which a login lapses, unless "remember me"
    /// widened it at login time.
    pub expiry: Duration,
    pub name: String,
}

impl SessionConfig {
    /// HTTPS-only `__Host-session` cookie that lapses after 2 idle hours.
    pub fn production() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            expiry: Duration::hours(2),
            name: "__Host-session".to_string(),
        }
    }

    /// Plain `session` cookie, usable over http, kept for a week of inactivity.
    pub fn development() -> Self {
        Self {
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            expiry: Duration::days(7),
            name: "session".to_string(),
        }
    }

    /// Pick the policy from `ENVIRONMENT` (`production` or anything else).
    pub fn from_env() -> Self {
        if is_production() {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Build the session layer over `store`, signing with `SESSION_SECRET`.
    pub fn create_layer(&self, store: SqliteStore) -> SessionLayer {
        SessionManagerLayer::new(store)
            .with_secure(self.secure)
            .with_http_only(self.http_only)
            .with_same_site(self.same_site)
            .with_name(self.name.clone())
            .with_expiry(Expiry::OnInactivity(self.expiry))
            .with_signed(signing_key())
    }
}

/// Check that a production deployment forces HTTPS and signs login cookies
/// with a strong, non-placeholder secret. Always passes outside production.
pub fn validate_production_config() -> Result<(), ConfigError> {
    if !is_production() {
        return Ok(());
    }

    if !env_flag_enabled("FORCE_HTTPS") {
        return Err(ConfigError::HttpsRequired);
    }

    let secret = env::var("SESSION_SECRET").map_err(|_| ConfigError::MissingSessionSecret)?;
    if decode_secret_bytes(&secret).len() < KEY_BYTES {
        return Err(ConfigError::SessionSecretTooShort);
    }

    let lowered = secret.to_ascii_lowercase();
    if ["example", "changeme", "default"]
        .iter()
        .any(|placeholder| lowered.contains(placeholder))
    {
        return Err(ConfigError::DefaultSessionSecret);
    }

    Ok(())
}

pub fn is_production() -> bool {
    env::var("ENVIRONMENT").is_ok_and(|value| value == "production")
}

fn env_flag_enabled(key: &str) -> bool {
    env::var(key).is_ok_and(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "True"))
}

/// Without `SESSION_SECRET` every restart logs all users out.
fn signing_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) if !secret.is_empty() => key_from_secret_bytes(&decode_secret_bytes(&secret)),
        _ => {
            warn!("SESSION_SECRET not set; login sessions will not survive a restart");
            Key::generate()
        }
    }
}

/// `SESSION_SECRET` may be base64 or raw text.
fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

fn key_from_secret_bytes(bytes: &[u8]) -> Key {
    match bytes.get(..KEY_BYTES) {
        Some(prefix) => Key::from(prefix),
        None => Key::from(Sha512::digest(bytes).as_slice()),
    }
}
