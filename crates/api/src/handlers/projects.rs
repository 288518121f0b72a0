//! Handlers for the `/projects` resource and its milestones.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use servicecore_core::projects::{ACTIVITY_CREATED, ACTIVITY_UPDATED};
use servicecore_core::types::DbId;
use servicecore_db::models::project::{
    ActivityLog, CreateMilestone, CreateProject, Milestone, Project, ProjectMember, Task,
    UpdateProject,
};
use servicecore_db::repositories::{ProjectRepo, TaskRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project with everything its detail screen shows.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<ProjectMember>,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    pub activity: Vec<ActivityLog>,
}

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// POST /api/v1/projects
///
/// The caller becomes the owner. Logs a "Created Project" activity row.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    ProjectRepo::log_activity(
        &state.pool,
        Some(project.id),
        auth.user_id,
        ACTIVITY_CREATED,
        Some(&project.name),
    )
    .await?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = find_project(&state, id).await?;
    let members = ProjectRepo::members(&state.pool, id).await?;
    let milestones = ProjectRepo::milestones(&state.pool, id).await?;
    let tasks = TaskRepo::list(&state.pool, Some(id)).await?;
    let activity = ProjectRepo::activity(&state.pool, id).await?;

    Ok(Json(ProjectDetail {
        project,
        members,
        milestones,
        tasks,
        activity,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// A `team_member_ids` array replaces the whole team.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    ProjectRepo::log_activity(&state.pool, Some(id), auth.user_id, ACTIVITY_UPDATED, None).await?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Project", id));
    }
    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/milestones
pub async fn list_milestones(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Milestone>>>> {
    find_project(&state, id).await?;
    let milestones = ProjectRepo::milestones(&state.pool, id).await?;
    Ok(Json(DataResponse::new(milestones)))
}

/// POST /api/v1/projects/{id}/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    input.validate()?;
    find_project(&state, id).await?;
    let milestone = ProjectRepo::create_milestone(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(milestone)))
}
