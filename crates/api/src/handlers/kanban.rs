//! Handlers for the `/kanban` board.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use servicecore_core::projects::{validate_task_status, ACTIVITY_TASK_MOVED, KANBAN_COLUMNS};
use servicecore_core::types::DbId;
use servicecore_db::models::project::{MoveTask, Task};
use servicecore_db::repositories::{ProjectRepo, TaskRepo};

use super::tasks::{find_task, with_assignees, TaskSummary};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ProjectScope;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KanbanColumn {
    pub status: &'static str,
    pub tasks: Vec<TaskSummary>,
}

/// GET /api/v1/kanban?project_id=
///
/// Tasks grouped into the fixed board columns. Tasks whose status is not a
/// column are left off the board.
pub async fn board(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
) -> AppResult<Json<DataResponse<Vec<KanbanColumn>>>> {
    let tasks = TaskRepo::list(&state.pool, scope.project_id).await?;
    let mut summaries = with_assignees(&state, tasks).await?;

    let columns = KANBAN_COLUMNS
        .iter()
        .map(|&status| {
            let (in_column, rest): (Vec<_>, Vec<_>) =
                summaries.drain(..).partition(|s| s.task.status == status);
            summaries = rest;
            KanbanColumn {
                status,
                tasks: in_column,
            }
        })
        .collect();

    Ok(Json(DataResponse::new(columns)))
}

/// POST /api/v1/kanban/{task_id}/move
pub async fn move_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<MoveTask>,
) -> AppResult<Json<Task>> {
    validate_task_status(&input.status)?;
    let task = find_task(&state, task_id).await?;

    TaskRepo::set_status(&state.pool, task_id, &input.status).await?;
    ProjectRepo::log_activity(
        &state.pool,
        Some(task.project_id),
        auth.user_id,
        ACTIVITY_TASK_MOVED,
        Some(&format!("{}: {} -> {}", task.title, task.status, input.status)),
    )
    .await?;

    tracing::info!(task_id, from = %task.status, to = %input.status, "Task moved");
    let moved = find_task(&state, task_id).await?;
    Ok(Json(moved))
}
