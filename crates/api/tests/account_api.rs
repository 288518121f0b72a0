//! HTTP-level tests for sign-in, sessions and the account endpoints.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, get_with_cookie, login, login_admin, post_json, post_json_auth,
    ADMIN_EMAIL, USER_PASSWORD,
};
use servicecore_core::roles::{ROLE_AGENT, ROLE_USER};
use servicecore_db::models::user::UpdateUser;
use servicecore_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_sets_http_only_session_cookie(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": common::ADMIN_PASSWORD });
    let response = post_json(app, "/api/v1/account/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Set-Cookie header")
        .to_string();
    assert!(cookie.starts_with("sc_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert_eq!(json["user"]["role"], "Admin");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_email_is_case_insensitive(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login(app, "ADMIN@Test.Local", common::ADMIN_PASSWORD).await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": "nope" });
    let response = post_json(app, "/api/v1/account/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_deactivated_account_is_403_only_with_right_password(pool: PgPool) {
    let user = common::create_user(&pool, "Dormant", ROLE_USER).await;
    UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            name: None,
            email: None,
            role: None,
            department_id: None,
            phone: None,
            is_active: Some(false),
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({ "email": user.email, "password": "wrong-password" });
    let response = post_json(app.clone(), "/api/v1/account/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "email": user.email, "password": USER_PASSWORD });
    let response = post_json(app, "/api/v1/account/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = post_json(app, "/api/v1/account/logout", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// Session handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_route_without_session_is_401(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get(app, "/api/v1/tickets").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tampered_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;
    let response = get_auth(app, "/api/v1/account/me", &format!("{token}x")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_cookie_authenticates(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = get_with_cookie(app, "/api/v1/account/me", &format!("sc_session={token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_reports_feature_map_for_role(pool: PgPool) {
    let user = common::create_user(&pool, "Reader", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let json = body_json(get_auth(app, "/api/v1/account/me", &token).await).await;
    assert_eq!(json["features"]["Tickets_View"], true);
    assert_eq!(json["features"]["Tickets_Create"], true);
    assert_eq!(json["features"]["Admin_Permissions"], false);
    assert_eq!(json["features"]["Projects_Manage"], false);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_requires_admin(pool: PgPool) {
    let agent = common::create_user(&pool, "Agent", ROLE_AGENT).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &agent.email, USER_PASSWORD).await;

    let body = serde_json::json!({
        "name": "New Person",
        "email": "new@test.local",
        "password": "secret1",
        "confirm_password": "secret1",
    });
    let response = post_json_auth(app, "/api/v1/account/register", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_creates_user_with_default_role(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let body = serde_json::json!({
        "name": "New Person",
        "email": "New@Test.Local",
        "password": "secret1",
        "confirm_password": "secret1",
    });
    let response = post_json_auth(app.clone(), "/api/v1/account/register", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "new@test.local");
    assert_eq!(json["role"], "User");

    let again = post_json_auth(app, "/api/v1/account/register", body, &token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_mismatched_passwords(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let body = serde_json::json!({
        "name": "New Person",
        "email": "new@test.local",
        "password": "secret1",
        "confirm_password": "secret2",
    });
    let response = post_json_auth(app, "/api/v1/account/register", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
