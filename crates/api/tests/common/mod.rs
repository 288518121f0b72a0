#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use servicecore_api::auth::password::hash_password;
use servicecore_api::auth::session::SessionConfig;
use servicecore_api::config::ServerConfig;
use servicecore_api::router::build_app_router;
use servicecore_api::state::AppState;
use servicecore_db::models::user::{CreateUser, User};
use servicecore_db::repositories::UserRepo;
use servicecore_mail::FileMailer;

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const USER_PASSWORD: &str = "user-pass-123";

/// A scratch directory unique to one test.
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("servicecore-test-{}", uuid::Uuid::new_v4()))
}

/// Build a test `ServerConfig` with safe defaults and a private upload dir.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: scratch_dir().join("uploads"),
        seed_admin_email: ADMIN_EMAIL.to_string(),
        seed_admin_password: ADMIN_PASSWORD.to_string(),
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            ttl_days: 7,
            cookie_secure: false,
        },
    }
}

/// Seed the database and build the full application router, with email
/// spooled to a temporary file.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the permission filter
/// and middleware stack are exercised exactly as in production.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let admin_hash = hash_password(ADMIN_PASSWORD).expect("hashing should succeed");
    servicecore_db::seed::run(&pool, ADMIN_EMAIL, &admin_hash)
        .await
        .expect("seeding should succeed");

    let mail_path = scratch_dir().join("email.log");
    std::fs::create_dir_all(mail_path.parent().unwrap()).expect("mail dir");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Arc::new(FileMailer::new(mail_path)),
    };
    build_app_router(state, &config)
}

/// Insert an active user with the given role and [`USER_PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, role: &str) -> User {
    let hashed = hash_password(USER_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@test.local", name.to_lowercase()),
            password_hash: hashed,
            role: role.to_string(),
            department_id: None,
            phone: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// POST a single file as `multipart/form-data` under the field `files`.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    file_name: &str,
    contents: &[u8],
    token: &str,
) -> Response<Body> {
    const BOUNDARY: &str = "servicecore-test-boundary";
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/plain\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Send a request with a raw `Cookie` header instead of a bearer token.
pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(axum::http::header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Sign in and return the session token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/account/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["token"].as_str().expect("token in login response").to_string()
}

pub async fn login_admin(app: Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}
