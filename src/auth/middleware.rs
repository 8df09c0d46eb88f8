use crate::auth::{redirect_found, session::is_authenticated};
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;
use tracing::{debug, warn};

/// Let authenticated sessions through; send everyone else to the login page.
pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    match is_authenticated(&session).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            debug!(path = %request.uri().path(), "Anonymous request to protected route");
            redirect_found("/login")
        }
        Err(e) => {
            warn!("Failed to read session: {}", e);
            redirect_found("/login")
        }
    }
}

/// Keep signed-in users away from the login and signup forms.
pub async fn redirect_if_authenticated(session: Session, request: Request, next: Next) -> Response {
    if let Ok(true) = is_authenticated(&session).await {
        redirect_found("/profile")
    } else {
        next.run(request).await
    }
}
