//! Knowledge-base solutions and topics.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{Date, DbId, Timestamp};
use validator::Validate;

/// A solution joined with its topic and author names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Solution {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub keywords: Option<String>,
    pub topic_id: Option<DbId>,
    pub topic_name: Option<String>,
    pub status: String,
    pub views: i64,
    pub owner_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub author_name: Option<String>,
    pub review_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSolution {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub keywords: Option<String>,
    pub topic_id: Option<DbId>,
    /// Defaults to `Draft`.
    pub status: Option<String>,
    pub review_date: Option<Date>,
    pub expiry_date: Option<Date>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSolution {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub keywords: Option<String>,
    pub topic_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub review_date: Option<Date>,
    pub expiry_date: Option<Date>,
}

/// Filters for the solution list.
#[derive(Debug, Clone, Default)]
pub struct SolutionFilter {
    /// Matches title, content or keywords (case-insensitive).
    pub search: Option<String>,
    pub topic_id: Option<DbId>,
    pub status: Option<String>,
    /// Also include this user's own solutions whatever their status.
    pub include_author: Option<DbId>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolutionTopic {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertTopic {
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "Topic name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Count of solutions per status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Authors ranked by article count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contributor {
    pub user_id: DbId,
    pub name: String,
    pub solution_count: i64,
}

/// Admin dashboard for the knowledge base.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionDashboard {
    pub by_status: Vec<StatusCount>,
    pub most_viewed: Vec<Solution>,
    pub top_contributors: Vec<Contributor>,
    pub needs_review: Vec<Solution>,
}
