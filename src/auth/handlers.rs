use crate::auth::{redirect_found, session};
use crate::error::Result;
use crate::flash::{self, FlashLevel, FlashMessage};
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::{CreateUserRequest, UserServiceError},
};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
struct SignupTemplate {
    signed_in: bool,
    flash: Option<FlashMessage>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    signed_in: bool,
    flash: Option<FlashMessage>,
}

// Missing fields deserialize as empty strings and are rejected by validation,
// so every submission ends in a redirect.
#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    remember: Option<String>,
}

impl LoginForm {
    fn remember_me(&self) -> bool {
        matches!(
            self.remember.as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }
}

pub async fn signup_page(session: Session) -> Result<impl IntoResponse> {
    Ok(SignupTemplate {
        signed_in: false,
        flash: flash::take(&session).await?,
    })
}

pub async fn signup_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let request = CreateUserRequest {
        email: form.email,
        name: form.name,
        password: form.password,
        password_confirm: None,
    };

    match app_state.user_service.create_user(request).await {
        Ok(_) => {
            flash::push(
                &session,
                FlashLevel::Success,
                "Account created. Please log in.",
            )
            .await?;
            Ok(redirect_found("/login"))
        }
        Err(UserServiceError::EmailTaken) => {
            flash::push(
                &session,
                FlashLevel::Error,
                "Email address already exists. Log in instead.",
            )
            .await?;
            Ok(redirect_found("/login"))
        }
        Err(err) if err.is_validation() => {
            flash::push(&session, FlashLevel::Error, err.to_string()).await?;
            Ok(redirect_found("/login"))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn login_page(session: Session) -> Result<impl IntoResponse> {
    Ok(LoginTemplate {
        signed_in: false,
        flash: flash::take(&session).await?,
    })
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let remember = form.remember_me();
    let request = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match app_state.auth_service.authenticate(request).await {
        Ok(user) => {
            session::log_in(&session, &user, remember).await?;
            info!(user_id = user.id, remember, "User logged in");
            Ok(redirect_found("/profile"))
        }
        Err(AuthServiceError::InvalidCredentials) => {
            warn!("Rejected login attempt");
            flash::push(
                &session,
                FlashLevel::Error,
                "Please check your login details and try again.",
            )
            .await?;
            Ok(redirect_found("/login"))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn logout_handler(session: Session) -> Result<Response> {
    if let Some(user) = session::current_user(&session).await? {
        info!(user_id = user.user_id, "User logged out");
    }
    session::log_out(&session).await?;
    Ok(redirect_found("/"))
}
