//! Route definitions for `/tickets` and the `/tickets-manager` workspace.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{tickets, tickets_manager};
use crate::state::AppState;
use crate::uploads::UPLOAD_BODY_LIMIT;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /lookups                   -> lookups
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/comments             -> add_comment
/// POST   /{id}/attachments          -> upload_attachments (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route("/lookups", get(tickets::lookups))
        .route(
            "/{id}",
            get(tickets::details)
                .put(tickets::update)
                .delete(tickets::delete),
        )
        .route("/{id}/comments", post(tickets::add_comment))
        .route(
            "/{id}/attachments",
            post(tickets::upload_attachments).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// Routes mounted at `/tickets-manager` (Admin, Agent, Technical).
///
/// ```text
/// GET    /                          -> list (?filter=my)
/// POST   /                          -> create
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/resolve              -> resolve
/// POST   /{id}/reassign             -> reassign
/// POST   /{id}/reminder             -> reminder
/// POST   /{id}/comments             -> add_comment
/// ```
pub fn manager_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets_manager::list).post(tickets_manager::create))
        .route(
            "/{id}",
            get(tickets_manager::details)
                .put(tickets_manager::update)
                .delete(tickets_manager::delete),
        )
        .route("/{id}/resolve", post(tickets_manager::resolve))
        .route("/{id}/reassign", post(tickets_manager::reassign))
        .route("/{id}/reminder", post(tickets_manager::reminder))
        .route("/{id}/comments", post(tickets_manager::add_comment))
}
