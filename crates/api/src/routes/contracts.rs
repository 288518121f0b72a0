//! Route definitions for `/contracts`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contracts;
use crate::state::AppState;
use crate::uploads::UPLOAD_BODY_LIMIT;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                          -> dashboard
/// POST   /                          -> create
/// GET    /reports                   -> reports
/// GET    /vendors                   -> vendors
/// POST   /vendors                   -> upsert_vendor
/// GET    /types                     -> types (admin only)
/// POST   /types                     -> upsert_type (admin only)
/// GET    /{id}                      -> details
/// PUT    /{id}                      -> update
/// POST   /{id}/submit               -> submit
/// POST   /{id}/approve              -> approve (admin only)
/// POST   /{id}/reject               -> reject (admin only)
/// POST   /{id}/payments             -> add_payment
/// POST   /{id}/attachments          -> upload_attachments (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contracts::dashboard).post(contracts::create))
        .route("/reports", get(contracts::reports))
        .route(
            "/vendors",
            get(contracts::vendors).post(contracts::upsert_vendor),
        )
        .route("/types", get(contracts::types).post(contracts::upsert_type))
        .route("/{id}", get(contracts::details).put(contracts::update))
        .route("/{id}/submit", post(contracts::submit))
        .route("/{id}/approve", post(contracts::approve))
        .route("/{id}/reject", post(contracts::reject))
        .route("/{id}/payments", post(contracts::add_payment))
        .route(
            "/{id}/attachments",
            post(contracts::upload_attachments).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
