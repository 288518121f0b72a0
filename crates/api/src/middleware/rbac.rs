//! Role gates layered on top of [`AuthUser`].
//!
//! The permission filter already checked the feature grant; these extractors
//! add the fixed role requirements some actions carry regardless of grants.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use servicecore_core::error::CoreError;
use servicecore_core::roles::{is_admin, is_staff};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the Admin role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a staff role (Admin, Agent or Technical).
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_staff(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin, Agent or Technical role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
