//! The per-request permission filter.
//!
//! Runs as a route layer on every protected `/api/v1` route:
//!
//! 1. Authenticate the session (cookie, then Bearer). Missing, invalid or
//!    expired sessions and deactivated users get 401.
//! 2. Derive the controller and action from the matched route template.
//! 3. Map them to a feature. Routes with no feature only need a session.
//! 4. Admin passes. Any other role needs a stored `true` grant, else 403.
//! 5. Attach [`AuthUser`] (with the role as stored now) to the request.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use servicecore_core::error::CoreError;
use servicecore_core::permissions::{feature_for, is_allowed, RouteAction};
use servicecore_core::roles::is_admin;
use servicecore_db::repositories::{PermissionRepo, UserRepo};

use super::auth::{authenticate, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

pub async fn enforce(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(request.headers(), &state.config.session)?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Session is no longer valid".into()))
        })?;

    let target = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| RouteAction::from_route(request.method().as_str(), path.as_str()));

    if let Some(feature) = target.as_ref().and_then(feature_for) {
        let stored = if is_admin(&user.role) {
            None
        } else {
            PermissionRepo::lookup(&state.pool, &user.role, feature.key()).await?
        };

        if !is_allowed(&user.role, stored) {
            tracing::warn!(
                user_id = user.id,
                role = %user.role,
                feature = feature.key(),
                "Access denied"
            );
            return Err(AppError::Core(CoreError::AccessDenied {
                feature: feature.key(),
            }));
        }
    }

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}
