use crate::auth::{current_user, redirect_found, session};
use crate::error::Result;
use crate::flash::{self, FlashMessage};
use crate::services::auth_service::AuthServiceError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::warn;

#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    signed_in: bool,
    name: String,
    email: String,
    flash: Option<FlashMessage>,
}

/// Profile page. Only reachable behind `require_auth`, but still checks the
/// session itself so an anonymous request can never render it.
pub async fn profile_handler(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let Some(identity) = current_user(&session).await? else {
        return Ok(redirect_found("/login"));
    };

    match app_state.auth_service.get_user_by_id(identity.user_id).await {
        Ok(user) => Ok(ProfileTemplate {
            signed_in: true,
            name: user.name,
            email: user.email,
            flash: flash::take(&session).await?,
        }
        .into_response()),
        Err(AuthServiceError::UserNotFound) => {
            warn!(
                user_id = identity.user_id,
                "Session refers to a deleted user; logging out"
            );
            session::log_out(&session).await?;
            Ok(redirect_found("/login"))
        }
        Err(err) => Err(err.into()),
    }
}
