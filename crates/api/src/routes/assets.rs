//! Route definitions for `/assets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                          -> list (?search, category_id, page)
/// POST   /                          -> create
/// GET    /categories                -> categories
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/assign               -> assign
/// POST   /{id}/maintenance          -> log_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list).post(assets::create))
        .route("/categories", get(assets::categories))
        .route(
            "/{id}",
            get(assets::details)
                .put(assets::update)
                .delete(assets::delete),
        )
        .route("/{id}/assign", post(assets::assign))
        .route("/{id}/maintenance", post(assets::log_maintenance))
}
