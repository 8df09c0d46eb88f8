use crate::auth::{current_user, AuthenticatedUser};
use crate::error::Result;
use crate::flash::{self, FlashMessage};
use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    signed_in: bool,
    user: Option<AuthenticatedUser>,
    flash: Option<FlashMessage>,
}

pub async fn index_handler(session: Session) -> Result<impl IntoResponse> {
    let user = current_user(&session).await?;
    Ok(IndexTemplate {
        signed_in: user.is_some(),
        user,
        flash: flash::take(&session).await?,
    })
}
