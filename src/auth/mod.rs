pub mod handlers;
pub mod middleware;
pub mod session;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

pub use session::{current_user, AuthenticatedUser};

/// `302 Found` to `location`. `axum::response::Redirect::to` answers with
/// `303 See Other`; the auth flow promises a plain 302.
pub fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
