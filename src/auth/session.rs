//! Authentication state stored in the per-client session.
//!
//! A session is authenticated exactly when it carries a user id. Login
//! cycles the session id before writing the identity, logout flushes the
//! whole record.

use crate::models::user::User;
use serde::{Deserialize, Serialize};
use time::Duration;
use tower_sessions::{session::Error, Expiry, Session};

pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";
pub const AUTH_TIMESTAMP_KEY: &str = "auth_timestamp";

/// Inactivity window applied when the user ticks "remember me".
pub const REMEMBER_ME_EXPIRY: Duration = Duration::days(30);

/// Identity of the caller behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

/// The authenticated identity for this session, or `None` when anonymous.
pub async fn current_user(session: &Session) -> Result<Option<AuthenticatedUser>, Error> {
    let Some(user_id) = session.get::<i64>(USER_ID_KEY).await? else {
        return Ok(None);
    };
    let email = session.get::<String>(EMAIL_KEY).await?.unwrap_or_default();

    Ok(Some(AuthenticatedUser { user_id, email }))
}

pub async fn is_authenticated(session: &Session) -> Result<bool, Error> {
    Ok(current_user(session).await?.is_some())
}

/// Move the session to the authenticated state for `user`.
pub async fn log_in(session: &Session, user: &User, remember: bool) -> Result<(), Error> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.insert(EMAIL_KEY, &user.email).await?;
    session
        .insert(AUTH_TIMESTAMP_KEY, chrono::Utc::now().timestamp())
        .await?;

    if remember {
        session.set_expiry(Some(Expiry::OnInactivity(REMEMBER_ME_EXPIRY)));
    }

    Ok(())
}

/// Return the session to the anonymous state. Safe on anonymous sessions.
pub async fn log_out(session: &Session) -> Result<(), Error> {
    session.flush().await
}
