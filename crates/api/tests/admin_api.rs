//! Lookup administration and the kanban board over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, login_admin, post_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Categories and topics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_with_children_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/categories",
        serde_json::json!({ "name": "Network" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let parent = body_json(response).await;

    let child = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/admin/categories",
            serde_json::json!({ "name": "Wi-Fi", "parent_id": parent["id"] }),
            &admin,
        )
        .await,
    )
    .await;
    assert_eq!(child["parent_id"], parent["id"]);

    let parent_uri = format!("/api/v1/admin/categories/{}", parent["id"]);
    let response = delete_auth(app.clone(), &parent_uri, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/categories/{}", child["id"]), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &parent_uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_topic_with_solutions_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/topics",
        serde_json::json!({ "name": "Printers" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let topic = body_json(response).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/solutions",
        serde_json::json!({
            "title": "Clear a paper jam",
            "content": "Open the rear door.",
            "topic_id": topic["id"],
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(app, &format!("/api/v1/admin/topics/{}", topic["id"]), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Kanban
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_kanban_move_rejects_unknown_column(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects",
        serde_json::json!({ "name": "Office move" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = body_json(response).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        serde_json::json!({ "project_id": project["id"], "title": "Pack desks" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    assert_eq!(task["status"], "To Do");
    let move_uri = format!("/api/v1/kanban/{}/move", task["id"]);

    let response = post_json_auth(app.clone(), &move_uri, serde_json::json!({ "status": "Blocked" }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(app.clone(), &move_uri, serde_json::json!({ "status": "Review" }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "Review");

    let board = body_json(
        get_auth(app, &format!("/api/v1/kanban?project_id={}", project["id"]), &admin).await,
    )
    .await;
    let review = board["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["status"] == "Review")
        .unwrap();
    assert_eq!(review["tasks"].as_array().unwrap().len(), 1);
}
