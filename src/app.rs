use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    auth::{self, middleware::redirect_if_authenticated},
    config::session::{is_production, SessionLayer},
    handlers, AppState,
};

/// Assemble the full application router.
pub fn build_router(app_state: AppState, session_layer: SessionLayer) -> Router {
    let protected_routes = Router::new()
        .route("/profile", get(handlers::profile_handler))
        .route("/logout", get(auth::handlers::logout_handler))
        .route_layer(middleware::from_fn(auth::middleware::require_auth));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route(
            "/signup",
            get(auth::handlers::signup_page)
                .route_layer(middleware::from_fn(redirect_if_authenticated))
                .post(auth::handlers::signup_handler),
        )
        .route(
            "/login",
            get(auth::handlers::login_page)
                .route_layer(middleware::from_fn(redirect_if_authenticated))
                .post(auth::handlers::login_handler),
        )
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             style-src 'self'; \
             img-src 'self' data:; \
             frame-ancestors 'none';",
        ),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if is_production() {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        );
    }

    response
}
