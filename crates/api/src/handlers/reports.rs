//! Handler for the `/reports` screen.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use servicecore_core::projects::completion_percent;
use servicecore_db::models::project::ProjectStats;
use servicecore_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectReport {
    #[serde(flatten)]
    pub stats: ProjectStats,
    pub completion_percent: i64,
}

/// GET /api/v1/reports
///
/// Task totals and completion per project.
pub async fn index(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectReport>>>> {
    let reports = ProjectRepo::stats(&state.pool)
        .await?
        .into_iter()
        .map(|stats| ProjectReport {
            completion_percent: completion_percent(stats.task_count, stats.completed_count),
            stats,
        })
        .collect();
    Ok(Json(DataResponse::new(reports)))
}
