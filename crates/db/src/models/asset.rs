//! Assets and their assignment, maintenance and history logs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{Date, DbId, Timestamp};
use validator::Validate;

/// An asset joined with category, department and holder names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub department_id: Option<DbId>,
    pub department_name: Option<String>,
    pub assigned_user_id: Option<DbId>,
    pub assigned_user_name: Option<String>,
    pub status: String,
    pub purchase_date: Option<Date>,
    pub purchase_cost: Option<f64>,
    pub warranty_expiry: Option<Date>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 200, message = "Asset name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Asset tag is required"))]
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub category_id: Option<DbId>,
    pub department_id: Option<DbId>,
    /// Defaults to `Available`.
    pub status: Option<String>,
    pub purchase_date: Option<Date>,
    #[validate(range(min = 0.0))]
    pub purchase_cost: Option<f64>,
    pub warranty_expiry: Option<Date>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub asset_tag: Option<String>,
    pub serial_number: Option<String>,
    pub category_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub status: Option<String>,
    pub purchase_date: Option<Date>,
    #[validate(range(min = 0.0))]
    pub purchase_cost: Option<f64>,
    pub warranty_expiry: Option<Date>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Filters for the asset list.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    /// Matches name or asset tag (case-insensitive).
    pub search: Option<String>,
    pub category_id: Option<DbId>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetAssignment {
    pub id: DbId,
    pub asset_id: DbId,
    pub user_id: DbId,
    pub assigned_by: Option<DbId>,
    pub assigned_at: Timestamp,
    pub returned_at: Option<Timestamp>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignAsset {
    pub user_id: DbId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetMaintenance {
    pub id: DbId,
    pub asset_id: DbId,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub performed_by: Option<String>,
    pub maintenance_date: Date,
    pub next_due_date: Option<Date>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogMaintenance {
    #[validate(length(min = 1, message = "Maintenance type is required"))]
    pub maintenance_type: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
    pub performed_by: Option<String>,
    pub maintenance_date: Option<Date>,
    pub next_due_date: Option<Date>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetHistory {
    pub id: DbId,
    pub asset_id: DbId,
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub notes: Option<String>,
    pub performed_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Values for a history row.
#[derive(Debug, Clone)]
pub struct NewAssetHistory<'a> {
    pub asset_id: DbId,
    pub action: &'a str,
    pub old_status: Option<&'a str>,
    pub new_status: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub performed_by: DbId,
}
