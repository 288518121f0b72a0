//! Session authentication and the [`AuthUser`] extractor.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use servicecore_core::error::CoreError;
use servicecore_core::types::DbId;

use crate::auth::session::{token_from_cookie_header, validate_token, Claims, SessionConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user attached to the request.
///
/// The permission filter inserts this into the request extensions after
/// loading the user's current role. Handlers take it as an extractor:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's role name (e.g. `"Admin"`, `"Agent"`).
    pub role: String,
}

/// Pull the session token from the `sc_session` cookie, falling back to an
/// `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(token_from_cookie_header);

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    })
}

/// Validate the session carried by the request headers.
pub fn authenticate(headers: &HeaderMap, config: &SessionConfig) -> Result<Claims, AppError> {
    let token = session_token(headers).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Sign in required".into()))
    })?;

    validate_token(token, config).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let claims = authenticate(&parts.headers, &state.config.session)?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; sc_session=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(session_token(&headers), Some("tok"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&headers), None);
    }
}
