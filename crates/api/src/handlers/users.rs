//! Handlers for the `/users` directory and invitations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::error::CoreError;
use servicecore_core::roles::DEFAULT_USER_ROLE;
use servicecore_core::types::DbId;
use servicecore_db::models::user::{CreateUser, UserResponse};
use servicecore_db::repositories::{RoleRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{generate_temporary_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: Option<String>,
    pub department_id: Option<DbId>,
}

/// The invited user and the one-time password they sign in with.
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub user: UserResponse,
    pub temporary_password: String,
}

/// Reject role names that have no row in `roles`.
pub(crate) async fn ensure_role_exists(state: &AppState, role: &str) -> AppResult<()> {
    if RoleRepo::exists(&state.pool, role).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role '{role}'"
        ))))
    }
}

/// Reject an email that already belongs to an account.
pub(crate) async fn ensure_email_free(state: &AppState, email: &str) -> AppResult<()> {
    if UserRepo::email_exists(&state.pool, email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }
    Ok(())
}

/// GET /api/v1/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    Ok(Json(DataResponse::new(UserRepo::list(&state.pool).await?)))
}

/// POST /api/v1/users/invite
///
/// Creates the account with a generated password, emails it to the new
/// user and returns it once so the inviter can pass it on.
pub async fn invite(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<InviteRequest>,
) -> AppResult<(StatusCode, Json<InviteResponse>)> {
    input.validate()?;
    let role = input.role.unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());
    ensure_role_exists(&state, &role).await?;
    ensure_email_free(&state, &input.email).await?;

    let temporary_password = generate_temporary_password();
    let password_hash = hash_password(&temporary_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            role,
            department_id: input.department_id,
            phone: None,
        },
    )
    .await?;

    let body = format!(
        "Hello {},\n\nAn account has been created for you. Sign in with this temporary password \
         and change it afterwards:\n\n{temporary_password}\n",
        user.name
    );
    if let Err(e) = state.mailer.send(&user.email, "Your ServiceCore account", &body).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to send invitation email");
    }

    tracing::info!(user_id = user.id, invited_by = auth.user_id, "User invited");

    let profile = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            user: profile,
            temporary_password,
        }),
    ))
}
