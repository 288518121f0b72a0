//! Handlers for the `/account` resource (sign-in, sign-out, profile,
//! registration).

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::error::CoreError;
use servicecore_core::permissions::{is_allowed, Feature};
use servicecore_core::roles::DEFAULT_USER_ROLE;
use servicecore_db::models::user::{CreateUser, UserResponse};
use servicecore_db::repositories::{PermissionRepo, UserRepo};
use validator::Validate;

use super::users::ensure_email_free;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::session::{clear_session_cookie, issue_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /account/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in. The token is also set as the session cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Request body for `POST /account/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// The signed-in user with the features their role resolves to.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub features: BTreeMap<&'static str, bool>,
}

/// Check strength and hash a new password.
pub(crate) fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/account/login
///
/// Verify email + password and start a cookie session. A deactivated
/// account is refused (403) only after the password checks out.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed sign-in");
        return Err(invalid());
    }

    // Only reveal the account state to callers who know the password.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let session = &state.config.session;
    let token = issue_token(user.id, &user.role, session)
        .map_err(|e| AppError::InternalError(format!("Session token error: {e}")))?;
    let profile = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;

    tracing::info!(user_id = user.id, role = %user.role, "User signed in");

    Ok((
        [(SET_COOKIE, session_cookie(&token, session))],
        Json(LoginResponse {
            token,
            expires_in: session.ttl_days * 24 * 60 * 60,
            user: profile,
        }),
    ))
}

/// POST /api/v1/account/logout
///
/// Clear the session cookie. Always succeeds.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
    )
}

/// GET /api/v1/account/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_response(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let stored: BTreeMap<String, bool> = PermissionRepo::list_for_role(&state.pool, &user.role)
        .await?
        .into_iter()
        .map(|p| (p.feature_key, p.is_allowed))
        .collect();

    let features = Feature::ALL
        .iter()
        .map(|f| {
            let key = f.key();
            (key, is_allowed(&user.role, stored.get(key).copied()))
        })
        .collect();

    Ok(Json(MeResponse { user, features }))
}

/// POST /api/v1/account/register
///
/// Admin-only. Creates a user with the default role.
pub async fn register(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    ensure_email_free(&state, &input.email).await?;

    let password_hash = hash_new_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            role: DEFAULT_USER_ROLE.to_string(),
            department_id: None,
            phone: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, registered_by = admin.user_id, "User registered");

    let profile = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    Ok((StatusCode::CREATED, Json(profile)))
}
