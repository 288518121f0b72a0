//! Repository for the `solutions` and `solution_topics` tables.

use sqlx::{PgPool, Postgres, QueryBuilder};
use servicecore_core::solutions::{STATUS_DRAFT, STATUS_EXPIRED, STATUS_PUBLISHED};
use servicecore_core::types::DbId;

use crate::models::solution::{
    Contributor, CreateSolution, Solution, SolutionFilter, SolutionTopic, StatusCount,
    UpdateSolution, UpsertTopic,
};

/// Joined projection used by every solution read.
const SELECT: &str = "SELECT s.id, s.title, s.content, s.keywords, \
     s.topic_id, t.name AS topic_name, s.status, s.views, \
     s.owner_id, s.created_by, u.name AS author_name, \
     s.review_date, s.expiry_date, s.created_at, s.updated_at \
     FROM solutions s \
     LEFT JOIN solution_topics t ON t.id = s.topic_id \
     LEFT JOIN users u ON u.id = s.created_by";

const TOPIC_COLUMNS: &str = "id, name, description, parent_id";

/// Provides CRUD operations for knowledge-base solutions.
pub struct SolutionRepo;

impl SolutionRepo {
    /// Insert a solution. The author also becomes its owner.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateSolution,
    ) -> Result<Solution, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO solutions
                (title, content, keywords, topic_id, status, owner_id, created_by,
                 review_date, expiry_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, $9), $6, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.keywords)
        .bind(input.topic_id)
        .bind(&input.status)
        .bind(created_by)
        .bind(input.review_date)
        .bind(input.expiry_date)
        .bind(STATUS_DRAFT)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!("{SELECT} WHERE s.id = $1");
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List solutions matching `filter`, most recently updated first.
    pub async fn list(pool: &PgPool, filter: &SolutionFilter) -> Result<Vec<Solution>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT);
        qb.push(" WHERE 1 = 1");
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(" AND (s.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.content ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.keywords ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(topic_id) = filter.topic_id {
            qb.push(" AND s.topic_id = ").push_bind(topic_id);
        }
        match (filter.status.as_deref(), filter.include_author) {
            (Some(status), Some(author)) => {
                qb.push(" AND (s.status = ")
                    .push_bind(status.to_string())
                    .push(" OR s.created_by = ")
                    .push_bind(author)
                    .push(" OR s.owner_id = ")
                    .push_bind(author)
                    .push(")");
            }
            (Some(status), None) => {
                qb.push(" AND s.status = ").push_bind(status.to_string());
            }
            (None, _) => {}
        }
        qb.push(" ORDER BY s.updated_at DESC, s.id DESC");
        qb.build_query_as::<Solution>().fetch_all(pool).await
    }

    /// Every published solution, most viewed first.
    pub async fn published(pool: &PgPool) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!("{SELECT} WHERE s.status = $1 ORDER BY s.views DESC, s.id");
        sqlx::query_as::<_, Solution>(&query)
            .bind(STATUS_PUBLISHED)
            .fetch_all(pool)
            .await
    }

    /// Update a solution. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSolution,
    ) -> Result<Option<Solution>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE solutions SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                keywords = COALESCE($4, keywords),
                topic_id = COALESCE($5, topic_id),
                owner_id = COALESCE($6, owner_id),
                review_date = COALESCE($7, review_date),
                expiry_date = COALESCE($8, expiry_date)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.keywords)
        .bind(input.topic_id)
        .bind(input.owner_id)
        .bind(input.review_date)
        .bind(input.expiry_date)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn set_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE solutions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE solutions SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM solutions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM solutions GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn most_viewed(pool: &PgPool, limit: i64) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY s.views DESC, s.id LIMIT $1");
        sqlx::query_as::<_, Solution>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn top_contributors(pool: &PgPool, limit: i64) -> Result<Vec<Contributor>, sqlx::Error> {
        sqlx::query_as::<_, Contributor>(
            "SELECT u.id AS user_id, u.name, COUNT(s.id) AS solution_count
             FROM solutions s JOIN users u ON u.id = s.created_by
             GROUP BY u.id, u.name
             ORDER BY solution_count DESC, u.name
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Non-expired solutions whose review date has passed.
    pub async fn needs_review(pool: &PgPool, limit: i64) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE s.review_date <= CURRENT_DATE AND s.status <> $1
             ORDER BY s.review_date, s.id LIMIT $2"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(STATUS_EXPIRED)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// Provides CRUD operations for solution topics.
pub struct TopicRepo;

impl TopicRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<SolutionTopic>, sqlx::Error> {
        let query = format!("SELECT {TOPIC_COLUMNS} FROM solution_topics ORDER BY name");
        sqlx::query_as::<_, SolutionTopic>(&query).fetch_all(pool).await
    }

    /// Insert when `input.id` is `None`, otherwise update in place.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertTopic,
    ) -> Result<Option<SolutionTopic>, sqlx::Error> {
        match input.id {
            None => {
                let query = format!(
                    "INSERT INTO solution_topics (name, description, parent_id)
                     VALUES ($1, $2, $3) RETURNING {TOPIC_COLUMNS}"
                );
                sqlx::query_as::<_, SolutionTopic>(&query)
                    .bind(&input.name)
                    .bind(&input.description)
                    .bind(input.parent_id)
                    .fetch_one(pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let query = format!(
                    "UPDATE solution_topics SET name = $2, description = $3, parent_id = $4
                     WHERE id = $1 RETURNING {TOPIC_COLUMNS}"
                );
                sqlx::query_as::<_, SolutionTopic>(&query)
                    .bind(id)
                    .bind(&input.name)
                    .bind(&input.description)
                    .bind(input.parent_id)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Whether any solution references the topic.
    pub async fn in_use(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM solutions WHERE topic_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM solution_topics WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
