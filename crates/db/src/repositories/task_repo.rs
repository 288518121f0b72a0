//! Repository for the `project_tasks`, `task_assignees` and `task_comments`
//! tables.

use sqlx::PgPool;
use servicecore_core::projects::{DEFAULT_PRIORITY, TASK_TODO};
use servicecore_core::types::DbId;

use crate::models::project::{CreateTask, Task, TaskAssignee, TaskComment, UpdateTask};

/// Joined projection used by every task read.
const SELECT: &str = "SELECT t.id, t.project_id, p.name AS project_name, t.milestone_id, \
     t.title, t.description, t.status, t.priority, t.due_date, t.created_by, \
     t.created_at, t.updated_at \
     FROM project_tasks t JOIN projects p ON p.id = t.project_id";

/// Provides CRUD operations for project tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task with its assignees in one transaction.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO project_tasks
                (project_id, milestone_id, title, description, status, priority, due_date, created_by)
             VALUES ($1, $2, $3, $4, COALESCE($5, $9), COALESCE($6, $10), $7, $8)
             RETURNING id",
        )
        .bind(input.project_id)
        .bind(input.milestone_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.due_date)
        .bind(created_by)
        .bind(TASK_TODO)
        .bind(DEFAULT_PRIORITY)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &input.assignee_ids {
            sqlx::query(
                "INSERT INTO task_assignees (task_id, user_id) VALUES ($1, $2)
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

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("{SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Tasks, optionally for one project, ordered by due date then id.
    pub async fn list(pool: &PgPool, project_id: Option<DbId>) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE ($1::BIGINT IS NULL OR t.project_id = $1)
             ORDER BY t.due_date NULLS LAST, t.id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. A present `assignee_ids` replaces the assignee set.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE project_tasks SET
                milestone_id = COALESCE($2, milestone_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date)
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.milestone_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.due_date)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(assignee_ids) = &input.assignee_ids {
            sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for user_id in assignee_ids {
                sqlx::query(
                    "INSERT INTO task_assignees (task_id, user_id) VALUES ($1, $2)
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

    /// Set a task's status (Kanban move).
    pub async fn set_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE project_tasks SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assignees for a set of tasks.
    pub async fn assignees(
        pool: &PgPool,
        task_ids: &[DbId],
    ) -> Result<Vec<TaskAssignee>, sqlx::Error> {
        sqlx::query_as::<_, TaskAssignee>(
            "SELECT ta.task_id, ta.user_id, u.name
             FROM task_assignees ta JOIN users u ON u.id = ta.user_id
             WHERE ta.task_id = ANY($1) ORDER BY u.name",
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await
    }

    pub async fn add_comment(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<TaskComment, sqlx::Error> {
        sqlx::query_as::<_, TaskComment>(
            "WITH inserted AS (
                INSERT INTO task_comments (task_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, task_id, user_id, content, created_at
             )
             SELECT i.id, i.task_id, i.user_id, u.name AS author_name, i.content, i.created_at
             FROM inserted i LEFT JOIN users u ON u.id = i.user_id",
        )
        .bind(task_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn comments(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskComment>, sqlx::Error> {
        sqlx::query_as::<_, TaskComment>(
            "SELECT c.id, c.task_id, c.user_id, u.name AS author_name, c.content, c.created_at
             FROM task_comments c LEFT JOIN users u ON u.id = c.user_id
             WHERE c.task_id = $1 ORDER BY c.created_at, c.id",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }
}
