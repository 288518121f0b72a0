//! Ticket lifecycle over HTTP: SLA due dates, visibility, comments and
//! closing through an approval.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{
    body_json, get_auth, login, login_admin, post_json_auth, put_json_auth, USER_PASSWORD,
};
use servicecore_core::roles::{ROLE_AGENT, ROLE_USER};
use servicecore_core::types::DbId;
use servicecore_db::repositories::{LookupRepo, NotificationRepo};
use sqlx::PgPool;

async fn priority_id(pool: &PgPool, name: &str) -> DbId {
    LookupRepo::priorities(pool)
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.name == name)
        .map(|p| p.id)
        .expect("seeded priority")
}

async fn status_id(pool: &PgPool, name: &str) -> DbId {
    LookupRepo::find_status_by_name(pool, name)
        .await
        .unwrap()
        .map(|s| s.id)
        .expect("seeded status")
}

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp string")
        .parse()
        .expect("RFC 3339 timestamp")
}

async fn open_ticket(app: axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/tickets", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_high_priority_ticket_is_due_in_eight_hours(pool: PgPool) {
    let high = priority_id(&pool, "High").await;
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(
        app,
        &token,
        serde_json::json!({ "subject": "VPN is down", "priority_id": high }),
    )
    .await;

    assert_eq!(ticket["status_name"], "Open");
    assert_eq!(ticket["requester_id"], user.id);
    let window = timestamp(&ticket["due_date"]) - timestamp(&ticket["created_at"]);
    assert!((window.num_seconds() - 8 * 3600).abs() <= 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_ticket_without_priority_gets_default_window(pool: PgPool) {
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(app, &token, serde_json::json!({ "subject": "Printer" })).await;

    let window = timestamp(&ticket["due_date"]) - timestamp(&ticket["created_at"]);
    assert!((window.num_seconds() - 24 * 3600).abs() <= 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_cannot_choose_assignee(pool: PgPool) {
    let agent = common::create_user(&pool, "Agent", ROLE_AGENT).await;
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(
        app,
        &token,
        serde_json::json!({ "subject": "Laptop", "assigned_to_id": agent.id }),
    )
    .await;
    assert!(ticket["assigned_to_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_subject_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let response =
        post_json_auth(app, "/api/v1/tickets", serde_json::json!({ "subject": "" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_uninvolved_user_cannot_see_ticket(pool: PgPool) {
    let owner = common::create_user(&pool, "Owner", ROLE_USER).await;
    let stranger = common::create_user(&pool, "Stranger", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let owner_token = login(app.clone(), &owner.email, USER_PASSWORD).await;
    let stranger_token = login(app.clone(), &stranger.email, USER_PASSWORD).await;

    let ticket = open_ticket(app.clone(), &owner_token, serde_json::json!({ "subject": "Mine" })).await;
    let uri = format!("/api/v1/tickets/{}", ticket["id"]);

    let response = get_auth(app.clone(), &uri, &stranger_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app.clone(), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["subject"], "Mine");
    assert!(detail["comments"].as_array().unwrap().is_empty());

    let list = body_json(get_auth(app, "/api/v1/tickets", &stranger_token).await).await;
    assert_eq!(list["total"], 0);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_requester_comment_notifies_assignee(pool: PgPool) {
    let agent = common::create_user(&pool, "Agent", ROLE_AGENT).await;
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool.clone()).await;
    let admin = login_admin(app.clone()).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(app.clone(), &token, serde_json::json!({ "subject": "Screen" })).await;
    let id = ticket["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/tickets-manager/{id}/reassign"),
        serde_json::json!({ "assigned_to_id": agent.id }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    NotificationRepo::mark_all_read(&pool, agent.id).await.unwrap();
    NotificationRepo::mark_all_read(&pool, user.id).await.unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/tickets/{id}/comments"),
        serde_json::json!({ "content": "Still flickering" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    assert_eq!(comment["content"], "Still flickering");

    assert_eq!(NotificationRepo::unread_count(&pool, agent.id).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_comment_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(app.clone(), &token, serde_json::json!({ "subject": "Mouse" })).await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/tickets/{}/comments", ticket["id"]),
        serde_json::json!({ "content": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Approvals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_approved_resolution_closes_ticket(pool: PgPool) {
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let ticket = open_ticket(app.clone(), &token, serde_json::json!({ "subject": "Keyboard" })).await;
    let ticket_id = ticket["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/approvals",
        serde_json::json!({
            "request_type": "Ticket_Resolution",
            "related_id": ticket_id,
            "subject": "Please close",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let approval = body_json(response).await;
    assert_eq!(approval["status"], "Pending");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/approvals/{}/action", approval["id"]),
        serde_json::json!({ "status": "Approved", "comments": "Done" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "Approved");

    let detail = body_json(get_auth(app, &format!("/api/v1/tickets/{ticket_id}"), &token).await).await;
    assert_eq!(detail["status_name"], "Closed");
    assert!(detail["resolution_date"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decided_approval_cannot_be_acted_on_again(pool: PgPool) {
    let user = common::create_user(&pool, "Requester", ROLE_USER).await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;
    let token = login(app.clone(), &user.email, USER_PASSWORD).await;

    let approval = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/approvals",
            serde_json::json!({ "request_type": "Purchase", "subject": "New monitor" }),
            &token,
        )
        .await,
    )
    .await;
    let uri = format!("/api/v1/approvals/{}/action", approval["id"]);

    let first = post_json_auth(app.clone(), &uri, serde_json::json!({ "status": "Rejected" }), &admin).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json_auth(app, &uri, serde_json::json!({ "status": "Approved" }), &admin).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_priority_change_recomputes_due_date_from_creation(pool: PgPool) {
    let low = priority_id(&pool, "Low").await;
    let critical = priority_id(&pool, "Critical").await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let ticket = open_ticket(
        app.clone(),
        &admin,
        serde_json::json!({ "subject": "Server room hot", "priority_id": low }),
    )
    .await;
    let created_at = timestamp(&ticket["created_at"]);
    assert!(((timestamp(&ticket["due_date"]) - created_at).num_seconds() - 48 * 3600).abs() <= 1);

    let response = put_json_auth(
        app,
        &format!("/api/v1/tickets/{}", ticket["id"]),
        serde_json::json!({ "priority_id": critical }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await;
    assert_eq!(edited["priority_name"], "Critical");
    assert_eq!(timestamp(&edited["created_at"]), created_at);
    assert!(((timestamp(&edited["due_date"]) - created_at).num_seconds() - 4 * 3600).abs() <= 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_closing_stamps_resolution_and_reopen_clears_it(pool: PgPool) {
    let closed = status_id(&pool, "Closed").await;
    let open = status_id(&pool, "Open").await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let ticket = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "Toner empty" })).await;
    assert!(ticket["resolution_date"].is_null());
    let uri = format!("/api/v1/tickets/{}", ticket["id"]);

    let response = put_json_auth(app.clone(), &uri, serde_json::json!({ "status_id": closed }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await;
    assert_eq!(edited["status_name"], "Closed");
    assert!(edited["resolution_date"].is_string());

    let response = put_json_auth(app, &uri, serde_json::json!({ "status_id": open }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reopened = body_json(response).await;
    assert_eq!(reopened["status_name"], "Open");
    assert!(reopened["resolution_date"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_edit_with_zero_assignee_unassigns(pool: PgPool) {
    let agent = common::create_user(&pool, "Fixer", ROLE_AGENT).await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tickets-manager",
        serde_json::json!({ "subject": "Docking station", "assigned_to_id": agent.id }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = body_json(response).await;
    assert_eq!(ticket["assigned_to_id"], agent.id);
    let uri = format!("/api/v1/tickets/{}", ticket["id"]);

    let kept = body_json(
        put_json_auth(app.clone(), &uri, serde_json::json!({ "subject": "Docking station USB-C" }), &admin)
            .await,
    )
    .await;
    assert_eq!(kept["assigned_to_id"], agent.id);

    let response = put_json_auth(app, &uri, serde_json::json!({ "assigned_to_id": 0 }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["assigned_to_id"].is_null());
}

// ---------------------------------------------------------------------------
// Manager actions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_resolve_sets_resolved_status(pool: PgPool) {
    let agent = common::create_user(&pool, "Fixer", ROLE_AGENT).await;
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;
    let token = login(app.clone(), &agent.email, USER_PASSWORD).await;

    let ticket = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "Slow laptop" })).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/tickets-manager/{}/resolve", ticket["id"]),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = body_json(response).await;
    assert_eq!(resolved["status_name"], "Resolved");
    assert!(resolved["resolution_date"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reassign_sets_and_clears_assignee(pool: PgPool) {
    let agent = common::create_user(&pool, "Fixer", ROLE_AGENT).await;
    let app = common::build_test_app(pool.clone()).await;
    let admin = login_admin(app.clone()).await;

    let ticket = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "Phone line" })).await;
    let uri = format!("/api/v1/tickets-manager/{}/reassign", ticket["id"]);

    let response = post_json_auth(app.clone(), &uri, serde_json::json!({ "assigned_to_id": agent.id }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["assigned_to_id"], agent.id);
    assert_eq!(NotificationRepo::unread_count(&pool, agent.id).await.unwrap(), 1);

    let response = post_json_auth(app.clone(), &uri, serde_json::json!({ "assigned_to_id": 0 }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["assigned_to_id"].is_null());

    post_json_auth(app.clone(), &uri, serde_json::json!({ "assigned_to_id": agent.id }), &admin).await;
    let response = post_json_auth(app, &uri, serde_json::json!({ "assigned_to_id": null }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["assigned_to_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reminder_without_assignee_is_400(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let ticket = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "Badge reader" })).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/tickets-manager/{}/reminder", ticket["id"]),
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_list_puts_recently_updated_first(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(app.clone()).await;

    let first = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "First" })).await;
    let second = open_ticket(app.clone(), &admin, serde_json::json!({ "subject": "Second" })).await;

    let list = body_json(get_auth(app.clone(), "/api/v1/tickets", &admin).await).await;
    assert_eq!(list["items"][0]["id"], second["id"]);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/tickets/{}", first["id"]),
        serde_json::json!({ "subject": "First, edited" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(get_auth(app, "/api/v1/tickets-manager", &admin).await).await;
    assert_eq!(list["items"][0]["id"], first["id"]);
    assert_eq!(list["items"][1]["id"], second["id"]);
}
