//! Handlers for the `/users-manager` administration screen.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use servicecore_core::csv::{user_row, USERS_HEADER};
use servicecore_core::error::CoreError;
use servicecore_core::roles::{is_admin, DEFAULT_USER_ROLE, ROLE_ADMIN};
use servicecore_core::types::DbId;
use servicecore_db::models::user::{CreateUser, NewUserRequest, UpdateUser, User, UserResponse};
use servicecore_db::repositories::UserRepo;
use validator::Validate;

use super::account::hash_new_password;
use super::users::{ensure_email_free, ensure_role_exists};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users-manager/{id}/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

async fn profile(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

/// Refuse changes that would leave the system without an active Admin.
async fn guard_last_admin(state: &AppState, user: &User) -> AppResult<()> {
    if is_admin(&user.role) && UserRepo::count_with_role(&state.pool, ROLE_ADMIN).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot remove the last Admin".into(),
        )));
    }
    Ok(())
}

/// GET /api/v1/users-manager
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    Ok(Json(DataResponse::new(UserRepo::list(&state.pool).await?)))
}

/// POST /api/v1/users-manager
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    let role = input.role.unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());
    ensure_role_exists(&state, &role).await?;
    ensure_email_free(&state, &input.email).await?;

    let password_hash = hash_new_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            role,
            department_id: input.department_id,
            phone: input.phone,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = auth.user_id, "User created");
    Ok((StatusCode::CREATED, Json(profile(&state, user.id).await?)))
}

/// PUT /api/v1/users-manager/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    let existing = find_user(&state, id).await?;

    if let Some(role) = &input.role {
        ensure_role_exists(&state, role).await?;
        if !is_admin(role) {
            guard_last_admin(&state, &existing).await?;
        }
    }
    if input.is_active == Some(false) {
        guard_last_admin(&state, &existing).await?;
    }
    if let Some(email) = &input.email {
        if !email.trim().eq_ignore_ascii_case(&existing.email) {
            ensure_email_free(&state, email).await?;
        }
    }

    UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, updated_by = auth.user_id, "User updated");
    Ok(Json(profile(&state, id).await?))
}

/// DELETE /api/v1/users-manager/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == auth.user_id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }
    let existing = find_user(&state, id).await?;
    guard_last_admin(&state, &existing).await?;

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }
    tracing::info!(user_id = id, deleted_by = auth.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users-manager/{id}/password
pub async fn reset_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;
    find_user(&state, id).await?;

    let password_hash = hash_new_password(&input.new_password)?;
    UserRepo::update_password(&state.pool, id, &password_hash).await?;

    tracing::info!(user_id = id, reset_by = auth.user_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users-manager/export
///
/// Downloads every user as `users.csv`.
pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;

    let mut csv = String::from(USERS_HEADER);
    csv.push('\n');
    for user in &users {
        csv.push_str(&user_row(
            user.id,
            &user.name,
            &user.role,
            user.department_name.as_deref(),
        ));
        csv.push('\n');
    }

    Ok((
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment; filename=\"users.csv\""),
        ],
        csv,
    ))
}
