//! Home dashboard figures.

use serde::Serialize;
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};

/// Raw counts gathered in a single query.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardCounts {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub finished_tickets: i64,
    pub finished_on_time: i64,
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_tasks: i64,
    pub overdue_tasks: i64,
}

/// An open ticket past the stale threshold.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaleTicket {
    pub id: DbId,
    pub subject: String,
    pub status_name: String,
    pub requester_name: String,
    pub created_at: Timestamp,
}
