//! Projects, milestones, tasks and the activity log.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{Date, DbId, Timestamp};
use validator::Validate;

/// A project row joined with owner and team-lead names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub owner_id: Option<DbId>,
    pub owner_name: Option<String>,
    pub team_lead_id: Option<DbId>,
    pub team_lead_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200, message = "Project name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `Planning` if omitted.
    pub status: Option<String>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub team_lead_id: Option<DbId>,
    #[serde(default)]
    pub team_member_ids: Vec<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// When `team_member_ids` is present it replaces the whole member set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub team_lead_id: Option<DbId>,
    pub team_member_ids: Option<Vec<DbId>>,
}

/// A team member of a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
}

/// Task totals for the reports screen.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectStats {
    pub project_id: DbId,
    pub project_name: String,
    pub status: String,
    pub task_count: i64,
    pub completed_count: i64,
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub due_date: Option<Date>,
    pub is_completed: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    #[validate(length(min = 1, message = "Milestone name is required"))]
    pub name: String,
    pub due_date: Option<Date>,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub milestone_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Date>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    pub project_id: DbId,
    pub milestone_id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "Task title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `To Do`.
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Date>,
    #[serde(default)]
    pub assignee_ids: Vec<DbId>,
}

/// When `assignee_ids` is present it replaces the whole assignee set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTask {
    pub milestone_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Date>,
    pub assignee_ids: Option<Vec<DbId>>,
}

/// Kanban move request.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveTask {
    pub status: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskAssignee {
    pub task_id: DbId,
    pub user_id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskComment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}
