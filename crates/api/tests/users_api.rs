//! User administration, invitations, CSV export and settings over HTTP.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, delete_auth, get_auth, login, login_admin, post_json_auth,
    put_json_auth,
};
use servicecore_core::roles::ROLE_AGENT;
use sqlx::PgPool;

async fn admin_id(app: axum::Router, token: &str) -> i64 {
    let me = body_json(get_auth(app, "/api/v1/account/me", token).await).await;
    me["user"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_returns_csv_download(pool: PgPool) {
    common::create_user(&pool, "Agent", ROLE_AGENT).await;
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = get_auth(app, "/api/v1/users-manager/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"users.csv\""
    );

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("Id,Name,Role,Department"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r.ends_with(",\"Administrator\",\"Admin\",\"\"")));
    assert!(rows.iter().any(|r| r.contains("\"Agent\",\"Agent\"")));
}

// ---------------------------------------------------------------------------
// Invitations and account management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invited_user_signs_in_with_temporary_password(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users/invite",
        serde_json::json!({ "name": "Newcomer", "email": "newcomer@test.local" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "User");
    let temporary = json["temporary_password"].as_str().unwrap().to_string();
    assert!(temporary.len() >= 8);

    let invited = login(app, "newcomer@test.local", &temporary).await;
    assert!(!invited.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invite_with_unknown_role_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = post_json_auth(
        app,
        "/api/v1/users/invite",
        serde_json::json!({ "name": "Ghost", "email": "ghost@test.local", "role": "Wizard" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_cannot_delete_self(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;
    let id = admin_id(app.clone(), &token).await;

    let response = delete_auth(app, &format!("/api/v1/users-manager/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_last_admin_cannot_be_demoted(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;
    let id = admin_id(app.clone(), &token).await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/users-manager/{id}"),
        serde_json::json!({ "role": "User" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_password_reset_replaces_credentials(pool: PgPool) {
    let agent = common::create_user(&pool, "Agent", ROLE_AGENT).await;
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/users-manager/{}/password", agent.id),
        serde_json::json!({ "new_password": "fresh-pass", "confirm_password": "fresh-pass" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let relogin = login(app, &agent.email, "fresh-pass").await;
    assert!(!relogin.is_empty());
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_setting_upsert_overwrites_value(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    for value in ["Desk", "Helpdesk"] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/settings",
            serde_json::json!({ "key": "site_name", "value": value }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = body_json(get_auth(app, "/api/v1/settings", &token).await).await;
    let settings = json["data"].as_array().unwrap();
    let matching: Vec<_> = settings.iter().filter(|s| s["key"] == "site_name").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["value"], "Helpdesk");
}
