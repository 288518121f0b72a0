//! Handlers for the `/notifications` resource.
//!
//! Every endpoint works on the authenticated user's own notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::types::DbId;
use servicecore_db::models::notification::Notification;
use servicecore_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

const MAX_LIMIT: i64 = 100;

const DEFAULT_LIMIT: i64 = 50;

/// How many unread items the header badge dropdown shows.
const UNREAD_PREVIEW: i64 = 5;

#[derive(Debug, Serialize)]
pub struct UnreadSummary {
    pub count: i64,
    pub items: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/notifications/unread
///
/// Unread count plus the newest few unread items.
pub async fn unread(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UnreadSummary>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    let items =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, true, UNREAD_PREVIEW, 0).await?;
    Ok(Json(UnreadSummary { count, items }))
}

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// POST /api/v1/notifications/{id}/read
///
/// 404 when the notification does not belong to the caller.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, id, auth.user_id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(MarkedRead { marked_read })))
}
