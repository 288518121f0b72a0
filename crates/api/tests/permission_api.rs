//! The permission filter in front of every `/api/v1` route.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login, login_admin, post_json_auth, put_json_auth, USER_PASSWORD};
use servicecore_core::roles::ROLE_USER;
use sqlx::PgPool;

fn new_project() -> serde_json::Value {
    serde_json::json!({ "name": "Office move" })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_without_grant_gets_access_denied(pool: PgPool) {
    let user = common::create_user(&pool, "Plain", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let response = post_json_auth(app, "/api/v1/projects", new_project(), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ACCESS_DENIED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_passes_every_feature(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = login_admin(app.clone()).await;

    let response = post_json_auth(app, "/api/v1/projects", new_project(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_granting_feature_opens_route(pool: PgPool) {
    let user = common::create_user(&pool, "Planner", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let grant = serde_json::json!({ "Projects_Manage": true });
    let response = put_json_auth(app.clone(), "/api/v1/admin/permissions/User", grant, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, "/api/v1/projects", new_project(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_feature_key_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let grant = serde_json::json!({ "Projects_Manage": true, "Rockets_Launch": true });
    let response = put_json_auth(app, "/api/v1/admin/permissions/User", grant, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_permission_listing_covers_every_feature(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = get_auth(app, "/api/v1/admin/permissions?role=Member", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 31);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_permission_listing_for_unknown_role_is_400(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = get_auth(app, "/api/v1/admin/permissions?role=Pirate", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_settings_require_admin_settings_feature(pool: PgPool) {
    let user = common::create_user(&pool, "Nosy", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let response = get_auth(app, "/api/v1/settings", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_notifications_need_only_a_session(pool: PgPool) {
    let user = common::create_user(&pool, "Reader", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let response = get_auth(app, "/api/v1/notifications/unread", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
}
