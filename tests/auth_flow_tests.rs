// End-to-end tests of the signup / login / logout / profile flow, driven
// through the full router against an in-memory SQLite database.

use authgate::{
    repositories::user_repository::{SqliteUserRepository, UserRepository},
    test_utils::test_helpers,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceExt; // for `oneshot`
use tower_sessions::cookie::Cookie;

async fn setup() -> (Router, SqlitePool) {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(pool.clone()).await.unwrap();
    (app, pool)
}

async fn setup_with_user() -> (Router, SqlitePool) {
    let (app, pool) = setup().await;
    test_helpers::insert_test_user(&pool, "test@example.com", "Test User", "password")
        .await
        .unwrap();
    (app, pool)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect to carry a Location header")
        .to_str()
        .unwrap()
}

/// The `name=value` pair of the session cookie set by `response`, if any.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
        .find(|cookie| cookie.name() == "session" && !cookie.value().is_empty())
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> Response<Body> {
    send(
        app,
        post_form("/login", &[("email", email), ("password", password)], None),
    )
    .await
}

#[tokio::test]
async fn test_profile_route_requires_login() {
    let (app, _pool) = setup().await;

    let response = send(&app, get("/profile", None)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));
}

#[tokio::test]
async fn test_signup() {
    let (app, pool) = setup().await;

    let response = send(
        &app,
        post_form(
            "/signup",
            &[
                ("email", "test@example.com"),
                ("name", "Test User"),
                ("password", "password"),
            ],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let repository = SqliteUserRepository::new(pool);
    let user = repository
        .find_by_email("test@example.com")
        .await
        .unwrap()
        .expect("user to be persisted");
    assert_eq!(user.name, "Test User");
    assert_ne!(user.password_hash, "password");
}

#[tokio::test]
async fn test_signup_duplicate_email_redirects_to_login_without_overwriting() {
    let (app, pool) = setup_with_user().await;

    let response = send(
        &app,
        post_form(
            "/signup",
            &[
                ("email", "test@example.com"),
                ("name", "Impostor"),
                ("password", "another-password"),
            ],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let cookie = session_cookie(&response).expect("flash to be stored in a session");
    let page = body_text(send(&app, get("/login", Some(&cookie))).await).await;
    assert!(page.contains("Email address already exists"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // The original credentials still work
    let response = login(&app, "test@example.com", "password").await;
    assert!(location(&response).contains("/profile"));
}

#[tokio::test]
async fn test_signup_with_invalid_email_redirects_to_login() {
    let (app, pool) = setup().await;

    let response = send(
        &app,
        post_form(
            "/signup",
            &[
                ("email", "not-an-email"),
                ("name", "Test User"),
                ("password", "password"),
            ],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let cookie = session_cookie(&response).expect("flash to be stored in a session");
    let page = body_text(send(&app, get("/login", Some(&cookie))).await).await;
    assert!(page.contains("Please enter a valid email address"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_signup_with_short_password_creates_user() {
    let (app, pool) = setup().await;

    let response = send(
        &app,
        post_form(
            "/signup",
            &[("email", "a@example.com"), ("name", "A"), ("password", "pw")],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let repository = SqliteUserRepository::new(pool);
    let user = repository
        .find_by_email("a@example.com")
        .await
        .unwrap()
        .expect("user to be persisted");
    assert_eq!(user.name, "A");

    let response = login(&app, "a@example.com", "pw").await;
    assert!(location(&response).contains("/profile"));
}

#[tokio::test]
async fn test_signup_with_missing_fields_redirects_to_login() {
    let (app, pool) = setup().await;

    let submissions: [&[(&str, &str)]; 3] = [
        &[("email", "test@example.com"), ("password", "password")],
        &[("email", "test@example.com"), ("name", "Test User")],
        &[],
    ];

    for fields in submissions {
        let response = send(&app, post_form("/signup", fields, None)).await;
        assert_eq!(response.status(), StatusCode::FOUND, "fields {fields:?}");
        assert!(location(&response).contains("/login"), "fields {fields:?}");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_login_with_missing_password_does_not_authenticate() {
    let (app, _pool) = setup_with_user().await;

    let response = send(
        &app,
        post_form("/login", &[("email", "test@example.com")], None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");

    let cookie = session_cookie(&response).expect("flash to be stored in a session");
    let profile = send(&app, get("/profile", Some(&cookie))).await;
    assert!(location(&profile).contains("/login"));
}

#[tokio::test]
async fn test_login() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "password").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/profile"));
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn test_authenticated_profile_shows_name() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "password").await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(&app, get("/profile", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Welcome, Test User!"));
}

#[tokio::test]
async fn test_signup_then_login_round_trip() {
    let (app, _pool) = setup().await;

    send(
        &app,
        post_form(
            "/signup",
            &[
                ("email", "new@example.com"),
                ("name", "New User"),
                ("password", "correct-horse"),
            ],
            None,
        ),
    )
    .await;

    let response = login(&app, "new@example.com", "correct-horse").await;
    assert!(location(&response).contains("/profile"));

    let cookie = session_cookie(&response).unwrap();
    let page = body_text(send(&app, get("/profile", Some(&cookie))).await).await;
    assert!(page.contains("New User"));
}

#[tokio::test]
async fn test_invalid_login_does_not_authenticate() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");

    let cookie = session_cookie(&response).expect("flash to be stored in a session");
    let profile = send(&app, get("/profile", Some(&cookie))).await;
    assert_eq!(profile.status(), StatusCode::FOUND);
    assert!(location(&profile).contains("/login"));

    let page = body_text(send(&app, get("/login", Some(&cookie))).await).await;
    assert!(page.contains("Please check your login details"));
}

#[tokio::test]
async fn test_unknown_email_does_not_authenticate() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "nobody@example.com", "password").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "password").await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    // The old cookie no longer grants access
    let profile = send(&app, get("/profile", Some(&cookie))).await;
    assert_eq!(profile.status(), StatusCode::FOUND);
    assert!(location(&profile).contains("/login"));
}

#[tokio::test]
async fn test_logout_when_anonymous_stays_anonymous() {
    let (app, _pool) = setup().await;

    let response = send(&app, get("/logout", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let profile = send(&app, get("/profile", None)).await;
    assert!(location(&profile).contains("/login"));
}

#[tokio::test]
async fn test_logged_in_user_is_sent_away_from_login_form() {
    let (app, _pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "password").await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile");

    let response = send(&app, get("/signup", Some(&cookie))).await;
    assert_eq!(location(&response), "/profile");
}

#[tokio::test]
async fn test_pages_render_with_security_headers() {
    let (app, _pool) = setup().await;

    for uri in ["/", "/login", "/signup"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        assert_eq!(
            response.headers().get("X-Frame-Options").unwrap(),
            "DENY",
            "GET {uri}"
        );
        assert_eq!(
            response.headers().get("X-Content-Type-Options").unwrap(),
            "nosniff"
        );
    }
}

#[tokio::test]
async fn test_profile_for_deleted_user_logs_out() {
    let (app, pool) = setup_with_user().await;

    let response = login(&app, "test@example.com", "password").await;
    let cookie = session_cookie(&response).unwrap();

    sqlx::query("DELETE FROM users WHERE email = ?")
        .bind("test@example.com")
        .execute(&pool)
        .await
        .unwrap();

    let response = send(&app, get("/profile", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).contains("/login"));

    let again = send(&app, get("/profile", Some(&cookie))).await;
    assert!(location(&again).contains("/login"));
}
