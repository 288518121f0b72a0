//! Route definitions for the `/solutions` knowledge base and `/approvals`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{approvals, solutions};
use crate::state::AppState;
use crate::uploads::UPLOAD_BODY_LIMIT;

/// Routes mounted at `/solutions`.
///
/// ```text
/// GET    /                          -> list (?search, topic_id, status)
/// POST   /                          -> create
/// GET    /dashboard                 -> dashboard (admin only)
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (admin only)
/// POST   /{id}/attachments          -> upload_attachments (multipart)
/// POST   /{id}/approve              -> approve (admin only)
/// POST   /{id}/publish              -> publish (admin only)
/// POST   /{id}/expire               -> expire (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(solutions::list).post(solutions::create))
        .route("/dashboard", get(solutions::dashboard))
        .route(
            "/{id}",
            get(solutions::details)
                .put(solutions::update)
                .delete(solutions::delete),
        )
        .route(
            "/{id}/attachments",
            post(solutions::upload_attachments).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/{id}/approve", post(solutions::approve))
        .route("/{id}/publish", post(solutions::publish))
        .route("/{id}/expire", post(solutions::expire))
}

/// Routes mounted at `/approvals`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> request
/// POST   /{id}/action               -> action
/// ```
pub fn approvals_router() -> Router<AppState> {
    Router::new()
        .route("/", get(approvals::list).post(approvals::request))
        .route("/{id}/action", post(approvals::action))
}
