//! Repository for the `tickets` and `ticket_comments` tables.

use sqlx::{PgPool, Postgres, QueryBuilder};
use servicecore_core::types::{DbId, Timestamp};

use crate::models::ticket::{
    NewTicket, Ticket, TicketChanges, TicketComment, TicketFilter, TicketOrder,
};

/// Joined projection used by every ticket read.
const SELECT: &str = "SELECT t.id, t.subject, t.description, \
     t.status_id, s.name AS status_name, \
     t.priority_id, p.name AS priority_name, \
     t.category_id, c.name AS category_name, \
     t.requester_id, r.name AS requester_name, \
     t.assigned_to_id, a.name AS assignee_name, \
     t.due_date, t.resolution_date, t.created_at, t.updated_at \
     FROM tickets t \
     JOIN ticket_statuses s ON s.id = t.status_id \
     LEFT JOIN ticket_priorities p ON p.id = t.priority_id \
     LEFT JOIN ticket_categories c ON c.id = t.category_id \
     JOIN users r ON r.id = t.requester_id \
     LEFT JOIN users a ON a.id = t.assigned_to_id";

const COUNT: &str = "SELECT COUNT(*) FROM tickets t JOIN users r ON r.id = t.requester_id";

const COMMENT_SELECT: &str = "SELECT tc.id, tc.ticket_id, tc.user_id, u.name AS author_name, \
     tc.content, tc.created_at \
     FROM ticket_comments tc LEFT JOIN users u ON u.id = tc.user_id";

/// Provides CRUD operations for tickets and their comments.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket and return it with lookup names resolved.
    pub async fn create(pool: &PgPool, input: &NewTicket) -> Result<Ticket, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO tickets
                (subject, description, status_id, priority_id, category_id,
                 requester_id, assigned_to_id, created_at, updated_at, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9)
             RETURNING id",
        )
        .bind(&input.subject)
        .bind(&input.description)
        .bind(input.status_id)
        .bind(input.priority_id)
        .bind(input.category_id)
        .bind(input.requester_id)
        .bind(input.assigned_to_id)
        .bind(input.created_at)
        .bind(input.due_date)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("{SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tickets matching `filter` in the filter's order.
    pub async fn list(
        pool: &PgPool,
        filter: &TicketFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT);
        push_filter(&mut qb, filter);
        qb.push(match filter.order {
            TicketOrder::Created => " ORDER BY t.created_at DESC, t.id DESC",
            TicketOrder::Updated => " ORDER BY COALESCE(t.updated_at, t.created_at) DESC, t.id DESC",
        });
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<Ticket>().fetch_all(pool).await
    }

    /// Count tickets matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TicketFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT);
        push_filter(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Apply an edit. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET
                subject = COALESCE($2, subject),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id),
                priority_id = COALESCE($5, priority_id),
                category_id = COALESCE($6, category_id),
                assigned_to_id = CASE WHEN $10 THEN NULL ELSE COALESCE($7, assigned_to_id) END,
                due_date = $8,
                resolution_date = $9
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.subject)
        .bind(&changes.description)
        .bind(changes.status_id)
        .bind(changes.priority_id)
        .bind(changes.category_id)
        .bind(changes.assigned_to_id)
        .bind(changes.due_date)
        .bind(changes.resolution_date)
        .bind(changes.clear_assignee)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Set (or clear) the assignee.
    pub async fn set_assignee(
        pool: &PgPool,
        id: DbId,
        assignee: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tickets SET assigned_to_id = $2 WHERE id = $1")
            .bind(id)
            .bind(assignee)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move to a status and stamp the resolution date.
    pub async fn set_status_resolved(
        pool: &PgPool,
        id: DbId,
        status_id: DbId,
        resolved_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET status_id = $2, resolution_date = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(status_id)
        .bind(resolved_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a ticket. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub async fn add_comment(
        pool: &PgPool,
        ticket_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<TicketComment, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO ticket_comments (ticket_id, user_id, content)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        let query = format!("{COMMENT_SELECT} WHERE tc.id = $1");
        sqlx::query_as::<_, TicketComment>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Comments on a ticket, oldest first.
    pub async fn list_comments(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketComment>, sqlx::Error> {
        let query = format!("{COMMENT_SELECT} WHERE tc.ticket_id = $1 ORDER BY tc.created_at, tc.id");
        sqlx::query_as::<_, TicketComment>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TicketFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (t.subject ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status_id) = filter.status_id {
        qb.push(" AND t.status_id = ").push_bind(status_id);
    }
    if let Some(priority_id) = filter.priority_id {
        qb.push(" AND t.priority_id = ").push_bind(priority_id);
    }
    if let Some(user_id) = filter.involving_user {
        qb.push(" AND (t.requester_id = ")
            .push_bind(user_id)
            .push(" OR t.assigned_to_id = ")
            .push_bind(user_id)
            .push(")");
    }
    if let Some(user_id) = filter.assigned_to {
        qb.push(" AND t.assigned_to_id = ").push_bind(user_id);
    }
}
