//! Ticket entity, lookups and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};
use validator::Validate;

/// A ticket joined with its lookup names and party names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub subject: String,
    pub description: Option<String>,
    pub status_id: DbId,
    pub status_name: String,
    pub priority_id: Option<DbId>,
    pub priority_name: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub requester_id: DbId,
    pub requester_name: String,
    pub assigned_to_id: Option<DbId>,
    pub assignee_name: Option<String>,
    pub due_date: Option<Timestamp>,
    pub resolution_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a ticket.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 1, max = 200, message = "Subject is required (max 200 characters)"))]
    pub subject: String,
    pub description: Option<String>,
    pub priority_id: Option<DbId>,
    pub category_id: Option<DbId>,
    /// Only honoured for staff callers.
    pub assigned_to_id: Option<DbId>,
}

/// Row values for an insert, with derived fields already computed.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub subject: String,
    pub description: Option<String>,
    pub status_id: DbId,
    pub priority_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub requester_id: DbId,
    pub assigned_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub due_date: Timestamp,
}

/// Request body for editing a ticket. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTicket {
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    pub category_id: Option<DbId>,
    /// `0` unassigns the ticket; omitted or `null` keeps the assignee.
    pub assigned_to_id: Option<DbId>,
}

/// Values written by an edit. `due_date` and `resolution_date` are written
/// as given (they may be cleared); the rest only when `Some`.
#[derive(Debug, Clone)]
pub struct TicketChanges {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub assigned_to_id: Option<DbId>,
    /// Unassign the ticket; wins over `assigned_to_id`.
    pub clear_assignee: bool,
    pub due_date: Option<Timestamp>,
    pub resolution_date: Option<Timestamp>,
}

/// Filters for ticket listings.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Matches subject or requester name (case-insensitive).
    pub search: Option<String>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    /// Restrict to tickets requested by or assigned to this user.
    pub involving_user: Option<DbId>,
    /// Restrict to tickets assigned to this user.
    pub assigned_to: Option<DbId>,
    pub order: TicketOrder,
}

/// Sort order for ticket listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketOrder {
    /// Newest tickets first.
    #[default]
    Created,
    /// Most recently touched tickets first.
    Updated,
}

/// A comment joined with its author's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketComment {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: String,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketStatus {
    pub id: DbId,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketPriority {
    pub id: DbId,
    pub name: String,
    pub level: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Upsert DTO for categories: with `id` updates, without inserts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertCategory {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Upsert DTO for priorities.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertPriority {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "Priority name is required"))]
    pub name: String,
    pub level: Option<i32>,
}
