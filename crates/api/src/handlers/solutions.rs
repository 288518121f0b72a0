//! Handlers for the `/solutions` knowledge base.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::error::CoreError;
use servicecore_core::roles::is_admin;
use servicecore_core::solutions::{
    apply_step, validate_status, visible_to, SolutionStep, DASHBOARD_TOP_N, STATUS_DRAFT,
    STATUS_PUBLISHED,
};
use servicecore_core::types::DbId;
use servicecore_db::models::attachment::{Attachment, AttachmentOwner};
use servicecore_db::models::solution::{
    CreateSolution, Solution, SolutionDashboard, SolutionFilter, UpdateSolution,
};
use servicecore_db::repositories::{AttachmentRepo, SolutionRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::save_attachments;

/// Query parameters for `GET /solutions`.
#[derive(Debug, Default, Deserialize)]
pub struct SolutionListQuery {
    pub search: Option<String>,
    pub topic_id: Option<DbId>,
    /// Ignored for non-admins, who see published articles plus their own.
    pub status: Option<String>,
}

/// A solution with its attached files.
#[derive(Debug, Serialize)]
pub struct SolutionDetail {
    #[serde(flatten)]
    pub solution: Solution,
    pub attachments: Vec<Attachment>,
}

async fn find_solution(state: &AppState, id: DbId) -> AppResult<Solution> {
    SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Solution", id))
}

/// Like [`find_solution`], but a solution the caller may not read is
/// reported as missing.
async fn find_visible_solution(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Solution> {
    let solution = find_solution(state, id).await?;
    if !visible_to(&solution.status, is_admin(&auth.role), is_author(&solution, auth)) {
        return Err(AppError::not_found("Solution", id));
    }
    Ok(solution)
}

fn is_author(solution: &Solution, auth: &AuthUser) -> bool {
    solution.created_by == Some(auth.user_id) || solution.owner_id == Some(auth.user_id)
}

/// GET /api/v1/solutions?search=&topic_id=&status=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SolutionListQuery>,
) -> AppResult<Json<DataResponse<Vec<Solution>>>> {
    let (status, include_author) = if is_admin(&auth.role) {
        (params.status, None)
    } else {
        (Some(STATUS_PUBLISHED.to_string()), Some(auth.user_id))
    };
    let filter = SolutionFilter {
        search: params.search,
        topic_id: params.topic_id,
        status,
        include_author,
    };
    Ok(Json(DataResponse::new(SolutionRepo::list(&state.pool, &filter).await?)))
}

/// GET /api/v1/solutions/dashboard
pub async fn dashboard(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SolutionDashboard>>> {
    let by_status = SolutionRepo::count_by_status(&state.pool).await?;
    let most_viewed = SolutionRepo::most_viewed(&state.pool, DASHBOARD_TOP_N).await?;
    let top_contributors = SolutionRepo::top_contributors(&state.pool, DASHBOARD_TOP_N).await?;
    let needs_review = SolutionRepo::needs_review(&state.pool, DASHBOARD_TOP_N).await?;

    Ok(Json(DataResponse::new(SolutionDashboard {
        by_status,
        most_viewed,
        top_contributors,
        needs_review,
    })))
}

/// POST /api/v1/solutions
///
/// Non-admin authors always start in `Draft`; the status field is only
/// honoured for admins.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateSolution>,
) -> AppResult<(StatusCode, Json<Solution>)> {
    input.validate()?;
    if is_admin(&auth.role) {
        if let Some(status) = &input.status {
            validate_status(status)?;
        }
    } else {
        input.status = Some(STATUS_DRAFT.to_string());
    }

    let solution = SolutionRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(solution_id = solution.id, user_id = auth.user_id, "Solution created");
    Ok((StatusCode::CREATED, Json(solution)))
}

/// GET /api/v1/solutions/{id}
///
/// Each read counts as a view.
pub async fn details(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SolutionDetail>> {
    find_visible_solution(&state, &auth, id).await?;
    SolutionRepo::increment_views(&state.pool, id).await?;
    let solution = find_solution(&state, id).await?;
    let attachments = AttachmentRepo::list(&state.pool, AttachmentOwner::Solution, id).await?;
    Ok(Json(SolutionDetail {
        solution,
        attachments,
    }))
}

/// POST /api/v1/solutions/{id}/attachments (multipart)
///
/// Admins and the solution's author may attach files.
pub async fn upload_attachments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Attachment>>>)> {
    let solution = find_visible_solution(&state, &auth, id).await?;
    if !is_admin(&auth.role) && !is_author(&solution, &auth) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can attach files to this solution".into(),
        )));
    }
    let saved =
        save_attachments(&state, AttachmentOwner::Solution, id, auth.user_id, multipart).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(saved))))
}

/// PUT /api/v1/solutions/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSolution>,
) -> AppResult<Json<Solution>> {
    input.validate()?;
    find_visible_solution(&state, &auth, id).await?;
    let solution = SolutionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Solution", id))?;
    tracing::info!(solution_id = id, user_id = auth.user_id, "Solution updated");
    Ok(Json(solution))
}

/// DELETE /api/v1/solutions/{id}
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SolutionRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Solution", id));
    }
    tracing::info!(solution_id = id, user_id = auth.user_id, "Solution deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn step(state: &AppState, auth: &AuthUser, id: DbId, step: SolutionStep) -> AppResult<Solution> {
    let solution = find_solution(state, id).await?;
    let next = apply_step(&solution.status, step)?;
    SolutionRepo::set_status(&state.pool, id, next).await?;
    tracing::info!(
        solution_id = id,
        user_id = auth.user_id,
        from = %solution.status,
        to = next,
        "Solution status changed"
    );
    find_solution(state, id).await
}

/// POST /api/v1/solutions/{id}/approve
pub async fn approve(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Solution>> {
    Ok(Json(step(&state, &auth, id, SolutionStep::Approve).await?))
}

/// POST /api/v1/solutions/{id}/publish
pub async fn publish(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Solution>> {
    Ok(Json(step(&state, &auth, id, SolutionStep::Publish).await?))
}

/// POST /api/v1/solutions/{id}/expire
pub async fn expire(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Solution>> {
    Ok(Json(step(&state, &auth, id, SolutionStep::Expire).await?))
}
