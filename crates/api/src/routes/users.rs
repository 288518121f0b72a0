//! Route definitions for `/users` and `/users-manager`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{users, users_manager};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                          -> list
/// POST   /invite                    -> invite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/invite", post(users::invite))
}

/// Routes mounted at `/users-manager`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /export                    -> export (text/csv)
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/password             -> reset_password
/// ```
pub fn manager_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users_manager::list).post(users_manager::create))
        .route("/export", get(users_manager::export))
        .route(
            "/{id}",
            put(users_manager::update).delete(users_manager::delete),
        )
        .route("/{id}/password", post(users_manager::reset_password))
}
