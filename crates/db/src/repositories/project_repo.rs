//! Repository for the `projects`, `project_members`, `milestones` and
//! `activity_logs` tables.

use sqlx::PgPool;
use servicecore_core::projects::{DEFAULT_PRIORITY, PROJECT_PLANNING, TASK_DONE};
use servicecore_core::types::DbId;

use crate::models::project::{
    ActivityLog, CreateMilestone, CreateProject, Milestone, Project, ProjectMember, ProjectStats,
    UpdateProject,
};

/// Joined projection used by every project read.
const SELECT: &str = "SELECT p.id, p.name, p.description, p.status, p.priority, \
     p.start_date, p.end_date, p.owner_id, o.name AS owner_name, \
     p.team_lead_id, l.name AS team_lead_name, p.created_at, p.updated_at \
     FROM projects p \
     LEFT JOIN users o ON o.id = p.owner_id \
     LEFT JOIN users l ON l.id = p.team_lead_id";

const MILESTONE_COLUMNS: &str = "id, project_id, name, due_date, is_completed, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project with its team members in one transaction.
    ///
    /// `status` defaults to Planning and `priority` to Medium.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects
                (name, description, status, priority, start_date, end_date, owner_id, team_lead_id)
             VALUES ($1, $2, COALESCE($3, $9), COALESCE($4, $10), $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(owner_id)
        .bind(input.team_lead_id)
        .bind(PROJECT_PLANNING)
        .bind(DEFAULT_PRIORITY)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &input.team_member_ids {
            sqlx::query(
                "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied; a
    /// present `team_member_ids` replaces the member set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                team_lead_id = COALESCE($8, team_lead_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.team_lead_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(member_ids) = &input.team_member_ids {
            sqlx::query("DELETE FROM project_members WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for user_id in member_ids {
                sqlx::query(
                    "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Permanently delete a project (tasks and milestones cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn members(pool: &PgPool, project_id: DbId) -> Result<Vec<ProjectMember>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT u.id AS user_id, u.name, u.email
             FROM project_members pm JOIN users u ON u.id = pm.user_id
             WHERE pm.project_id = $1 ORDER BY u.name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Task totals per project for the reports screen.
    pub async fn stats(pool: &PgPool) -> Result<Vec<ProjectStats>, sqlx::Error> {
        sqlx::query_as::<_, ProjectStats>(
            "SELECT p.id AS project_id, p.name AS project_name, p.status,
                    COUNT(t.id) AS task_count,
                    COUNT(t.id) FILTER (WHERE t.status = $1) AS completed_count
             FROM projects p LEFT JOIN project_tasks t ON t.project_id = p.id
             GROUP BY p.id, p.name, p.status
             ORDER BY p.name",
        )
        .bind(TASK_DONE)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Milestones
    // -----------------------------------------------------------------------

    pub async fn create_milestone(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones (project_id, name, due_date) VALUES ($1, $2, $3)
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn milestones(pool: &PgPool, project_id: DbId) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE project_id = $1
             ORDER BY due_date NULLS LAST, id"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Activity log
    // -----------------------------------------------------------------------

    pub async fn log_activity(
        pool: &PgPool,
        project_id: Option<DbId>,
        user_id: DbId,
        action: &str,
        details: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activity_logs (project_id, user_id, action, details)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(action)
        .bind(details)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn activity(pool: &PgPool, project_id: DbId) -> Result<Vec<ActivityLog>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT id, project_id, user_id, action, details, created_at
             FROM activity_logs WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
