//! Route definitions for `/projects`, `/tasks` and `/kanban`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{kanban, projects, tasks};
use crate::state::AppState;
use crate::uploads::UPLOAD_BODY_LIMIT;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// GET    /{id}/milestones           -> list_milestones
/// POST   /{id}/milestones           -> create_milestone
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::details)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/milestones",
            get(projects::list_milestones).post(projects::create_milestone),
        )
}

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                          -> list (?project_id)
/// POST   /                          -> create
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/comments             -> add_comment
/// POST   /{id}/attachments          -> upload_attachments (multipart)
/// ```
pub fn tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{id}",
            get(tasks::details).put(tasks::update).delete(tasks::delete),
        )
        .route("/{id}/comments", post(tasks::add_comment))
        .route(
            "/{id}/attachments",
            post(tasks::upload_attachments).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// Routes mounted at `/kanban`.
///
/// ```text
/// GET    /                          -> board (?project_id)
/// POST   /{task_id}/move            -> move_task
/// ```
pub fn kanban_router() -> Router<AppState> {
    Router::new()
        .route("/", get(kanban::board))
        .route("/{task_id}/move", post(kanban::move_task))
}
