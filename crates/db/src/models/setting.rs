//! Key/value application settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub id: DbId,
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSetting {
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,
    pub value: String,
}
