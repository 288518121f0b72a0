//! In-app notification rows.

use serde::Serialize;
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}
