//! Generic approval requests.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};
use validator::Validate;

/// An approval joined with requester and approver names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Approval {
    pub id: DbId,
    pub request_type: String,
    pub related_id: Option<DbId>,
    pub subject: String,
    pub description: Option<String>,
    pub status: String,
    pub requester_id: DbId,
    pub requester_name: String,
    pub approver_id: Option<DbId>,
    pub approver_name: Option<String>,
    pub comments: Option<String>,
    pub acted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestApproval {
    #[validate(length(min = 1, max = 50, message = "Request type is required"))]
    pub request_type: String,
    pub related_id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,
    pub description: Option<String>,
    /// Who should decide; any Admin/Agent can act regardless.
    pub approver_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalAction {
    /// `Approved`, `Rejected` or `Cancelled`.
    pub status: String,
    pub comments: Option<String>,
}
