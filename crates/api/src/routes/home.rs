//! Route definitions for the `/home` dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::{home, reports};
use crate::state::AppState;

/// Routes mounted at `/home`.
///
/// ```text
/// GET    /                          -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home::dashboard))
}

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /                          -> index
/// ```
pub fn reports_router() -> Router<AppState> {
    Router::new().route("/", get(reports::index))
}
