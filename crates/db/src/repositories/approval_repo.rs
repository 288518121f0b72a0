//! Repository for the `approvals` table.

use sqlx::PgPool;
use servicecore_core::approvals::STATUS_PENDING;
use servicecore_core::types::DbId;

use crate::models::approval::{Approval, RequestApproval};

/// Joined projection used by every approval read.
const SELECT: &str = "SELECT ap.id, ap.request_type, ap.related_id, ap.subject, ap.description, \
     ap.status, ap.requester_id, r.name AS requester_name, \
     ap.approver_id, a.name AS approver_name, ap.comments, ap.acted_at, ap.created_at \
     FROM approvals ap \
     JOIN users r ON r.id = ap.requester_id \
     LEFT JOIN users a ON a.id = ap.approver_id";

pub struct ApprovalRepo;

impl ApprovalRepo {
    pub async fn create(
        pool: &PgPool,
        requester_id: DbId,
        input: &RequestApproval,
    ) -> Result<Approval, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO approvals
                (request_type, related_id, subject, description, status, requester_id, approver_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&input.request_type)
        .bind(input.related_id)
        .bind(&input.subject)
        .bind(&input.description)
        .bind(STATUS_PENDING)
        .bind(requester_id)
        .bind(input.approver_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Approval>, sqlx::Error> {
        let query = format!("{SELECT} WHERE ap.id = $1");
        sqlx::query_as::<_, Approval>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every approval, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Approval>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY ap.created_at DESC, ap.id DESC");
        sqlx::query_as::<_, Approval>(&query).fetch_all(pool).await
    }

    /// Approvals the user requested or is asked to decide.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Approval>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE ap.requester_id = $1 OR ap.approver_id = $1
             ORDER BY ap.created_at DESC, ap.id DESC"
        );
        sqlx::query_as::<_, Approval>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record a decision on a pending approval.
    ///
    /// Returns `false` when the row is missing or no longer pending.
    pub async fn act(
        pool: &PgPool,
        id: DbId,
        approver_id: DbId,
        status: &str,
        comments: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE approvals SET status = $2, approver_id = $3, comments = $4, acted_at = NOW()
             WHERE id = $1 AND status = $5",
        )
        .bind(id)
        .bind(status)
        .bind(approver_id)
        .bind(comments)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
