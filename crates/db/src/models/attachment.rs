//! File attachments shared by tickets, tasks, contracts and solutions.

use serde::Serialize;
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};

/// Which attachment table a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentOwner {
    Ticket,
    Task,
    Contract,
    Solution,
}

impl AttachmentOwner {
    pub fn table(self) -> &'static str {
        match self {
            AttachmentOwner::Ticket => "ticket_attachments",
            AttachmentOwner::Task => "task_attachments",
            AttachmentOwner::Contract => "contract_attachments",
            AttachmentOwner::Solution => "solution_attachments",
        }
    }

    pub fn owner_column(self) -> &'static str {
        match self {
            AttachmentOwner::Ticket => "ticket_id",
            AttachmentOwner::Task => "task_id",
            AttachmentOwner::Contract => "contract_id",
            AttachmentOwner::Solution => "solution_id",
        }
    }

    /// Sub-directory under the upload root.
    pub fn directory(self) -> &'static str {
        match self {
            AttachmentOwner::Ticket => "tickets",
            AttachmentOwner::Task => "tasks",
            AttachmentOwner::Contract => "contracts",
            AttachmentOwner::Solution => "solutions",
        }
    }
}

/// An attachment row. `owner_id` is the id of the owning record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub owner_id: DbId,
    pub file_name: String,
    pub stored_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Values for a new attachment row.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub owner_id: DbId,
    pub file_name: String,
    pub stored_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: DbId,
}
