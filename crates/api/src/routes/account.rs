//! Route definitions for `/account`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes that work without a session. Registered with full paths so they
/// can be merged next to the protected `/account` routes.
///
/// ```text
/// POST   /account/login             -> login
/// POST   /account/logout            -> logout
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/account/login", post(account::login))
        .route("/account/logout", post(account::logout))
}

/// Routes mounted at `/account` that need a signed-in user.
///
/// ```text
/// GET    /me                        -> me
/// POST   /register                  -> register (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(account::me))
        .route("/register", post(account::register))
}
