//! Aggregate queries for the home dashboard.

use sqlx::PgPool;
use servicecore_core::projects::{ACTIVE_PROJECT_STATUSES, COMPLETED_TASK_STATUSES};
use servicecore_core::tickets::{FINISHED_STATUSES, STALE_AFTER_DAYS};
use servicecore_core::types::Timestamp;

use crate::models::dashboard::{DashboardCounts, StaleTicket};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Gather every dashboard count in one round trip.
    pub async fn counts(pool: &PgPool, now: Timestamp) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM tickets) AS total_tickets,
                (SELECT COUNT(*) FROM tickets t JOIN ticket_statuses s ON s.id = t.status_id
                  WHERE s.name <> ALL($1)) AS open_tickets,
                (SELECT COUNT(*) FROM tickets t JOIN ticket_statuses s ON s.id = t.status_id
                  WHERE s.name = ANY($1)) AS finished_tickets,
                (SELECT COUNT(*) FROM tickets t JOIN ticket_statuses s ON s.id = t.status_id
                  WHERE s.name = ANY($1)
                    AND t.resolution_date IS NOT NULL AND t.due_date IS NOT NULL
                    AND t.resolution_date <= t.due_date) AS finished_on_time,
                (SELECT COUNT(*) FROM projects) AS total_projects,
                (SELECT COUNT(*) FROM projects WHERE status = ANY($2)) AS active_projects,
                (SELECT COUNT(*) FROM project_tasks) AS total_tasks,
                (SELECT COUNT(*) FROM project_tasks
                  WHERE status <> ALL($3) AND due_date < $4::TIMESTAMPTZ::DATE) AS overdue_tasks",
        )
        .bind(FINISHED_STATUSES)
        .bind(ACTIVE_PROJECT_STATUSES)
        .bind(COMPLETED_TASK_STATUSES)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Open tickets created more than the stale threshold ago, oldest first.
    pub async fn stale_tickets(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<StaleTicket>, sqlx::Error> {
        let cutoff = now - chrono::Duration::days(STALE_AFTER_DAYS);
        sqlx::query_as::<_, StaleTicket>(
            "SELECT t.id, t.subject, s.name AS status_name, r.name AS requester_name, t.created_at
             FROM tickets t
             JOIN ticket_statuses s ON s.id = t.status_id
             JOIN users r ON r.id = t.requester_id
             WHERE s.name <> ALL($1) AND t.created_at < $2
             ORDER BY t.created_at, t.id
             LIMIT $3",
        )
        .bind(FINISHED_STATUSES)
        .bind(cutoff)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
