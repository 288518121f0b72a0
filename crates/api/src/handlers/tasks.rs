//! Handlers for the `/tasks` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use servicecore_core::projects::{validate_task_status, ACTIVITY_TASK_CREATED};
use servicecore_core::types::DbId;
use servicecore_db::models::attachment::{Attachment, AttachmentOwner};
use servicecore_db::models::project::{CreateTask, Task, TaskAssignee, TaskComment, UpdateTask};
use servicecore_db::models::ticket::CreateComment;
use servicecore_db::repositories::{AttachmentRepo, ProjectRepo, TaskRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectScope;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::save_attachments;

/// A task with its assignees attached.
#[derive(Debug, Serialize)]
pub struct TaskSummary {
    #[serde(flatten)]
    pub task: Task,
    pub assignees: Vec<TaskAssignee>,
}

#[derive(Debug, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub assignees: Vec<TaskAssignee>,
    pub comments: Vec<TaskComment>,
    pub attachments: Vec<Attachment>,
}

pub(crate) async fn find_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))
}

/// Pair each task with its assignees using one extra query.
pub(crate) async fn with_assignees(
    state: &AppState,
    tasks: Vec<Task>,
) -> AppResult<Vec<TaskSummary>> {
    let ids: Vec<DbId> = tasks.iter().map(|t| t.id).collect();
    let assignees = TaskRepo::assignees(&state.pool, &ids).await?;
    Ok(tasks
        .into_iter()
        .map(|task| TaskSummary {
            assignees: assignees
                .iter()
                .filter(|a| a.task_id == task.id)
                .cloned()
                .collect(),
            task,
        })
        .collect())
}

/// GET /api/v1/tasks?project_id=
pub async fn list(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
) -> AppResult<Json<DataResponse<Vec<TaskSummary>>>> {
    let tasks = TaskRepo::list(&state.pool, scope.project_id).await?;
    Ok(Json(DataResponse::new(with_assignees(&state, tasks).await?)))
}

/// POST /api/v1/tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_task_status(status)?;
    }
    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", input.project_id))?;

    let task = TaskRepo::create(&state.pool, auth.user_id, &input).await?;
    ProjectRepo::log_activity(
        &state.pool,
        Some(task.project_id),
        auth.user_id,
        ACTIVITY_TASK_CREATED,
        Some(&task.title),
    )
    .await?;

    tracing::info!(task_id = task.id, project_id = task.project_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/tasks/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskDetail>> {
    let task = find_task(&state, id).await?;
    let assignees = TaskRepo::assignees(&state.pool, &[id]).await?;
    let comments = TaskRepo::comments(&state.pool, id).await?;
    let attachments = AttachmentRepo::list(&state.pool, AttachmentOwner::Task, id).await?;

    Ok(Json(TaskDetail {
        task,
        assignees,
        comments,
        attachments,
    }))
}

/// PUT /api/v1/tasks/{id}
///
/// An `assignee_ids` array replaces the whole assignee set.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_task_status(status)?;
    }
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    tracing::info!(task_id = id, "Task updated");
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Task", id));
    }
    tracing::info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tasks/{id}/comments
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<TaskComment>)> {
    input.validate()?;
    find_task(&state, id).await?;
    let comment = TaskRepo::add_comment(&state.pool, id, auth.user_id, input.content.trim()).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /api/v1/tasks/{id}/attachments (multipart)
pub async fn upload_attachments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Attachment>>>)> {
    find_task(&state, id).await?;
    let saved =
        save_attachments(&state, AttachmentOwner::Task, id, auth.user_id, multipart).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(saved))))
}
