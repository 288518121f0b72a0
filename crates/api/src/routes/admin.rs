//! Route definitions for `/admin` and `/settings`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{admin, settings};
use crate::state::AppState;

/// Routes mounted at `/admin` (admin only).
///
/// ```text
/// GET    /                          -> index
/// POST   /categories                -> upsert_category
/// DELETE /categories/{id}           -> delete_category
/// POST   /priorities                -> upsert_priority
/// POST   /departments               -> upsert_department
/// GET    /roles                     -> roles
/// POST   /roles                     -> create_role
/// PUT    /roles/{id}                -> update_role
/// GET    /permissions               -> permissions (?role)
/// PUT    /permissions/{role}        -> save_permissions
/// GET    /topics                    -> topics
/// POST   /topics                    -> upsert_topic
/// DELETE /topics/{id}               -> delete_topic
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/categories", post(admin::upsert_category))
        .route("/categories/{id}", delete(admin::delete_category))
        .route("/priorities", post(admin::upsert_priority))
        .route("/departments", post(admin::upsert_department))
        .route("/roles", get(admin::roles).post(admin::create_role))
        .route("/roles/{id}", put(admin::update_role))
        .route("/permissions", get(admin::permissions))
        .route("/permissions/{role}", put(admin::save_permissions))
        .route("/topics", get(admin::topics).post(admin::upsert_topic))
        .route("/topics/{id}", delete(admin::delete_topic))
}

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> upsert
/// ```
pub fn settings_router() -> Router<AppState> {
    Router::new().route("/", get(settings::list).post(settings::upsert))
}
