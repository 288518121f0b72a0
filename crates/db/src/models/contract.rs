//! Contracts, vendors, contract types and the approval/payment/history logs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{Date, DbId, Timestamp};
use validator::Validate;

/// A contract joined with vendor and type names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub contract_number: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<String>,
    pub contract_type_id: Option<DbId>,
    pub contract_type_name: Option<String>,
    pub status: String,
    pub start_date: Date,
    pub end_date: Date,
    pub value: f64,
    pub currency: String,
    pub owner_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContract {
    #[validate(length(max = 50))]
    pub contract_number: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Contract title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub vendor_id: Option<DbId>,
    pub contract_type_id: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
    #[validate(range(min = 0.0, message = "Contract value cannot be negative"))]
    pub value: f64,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    pub owner_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateContract {
    #[validate(length(max = 50))]
    pub contract_number: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub vendor_id: Option<DbId>,
    pub contract_type_id: Option<DbId>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[validate(range(min = 0.0))]
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub owner_id: Option<DbId>,
}

/// Request body for approve / reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractDecision {
    pub comments: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractApproval {
    pub id: DbId,
    pub contract_id: DbId,
    pub approver_id: Option<DbId>,
    pub decision: String,
    pub comments: Option<String>,
    pub decided_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractPayment {
    pub id: DbId,
    pub contract_id: DbId,
    pub due_date: Date,
    pub amount: f64,
    pub status: String,
    pub payment_date: Option<Date>,
    pub reference: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    pub due_date: Date,
    #[validate(range(exclusive_min = 0.0, message = "Payment amount must be positive"))]
    pub amount: f64,
    /// Defaults to `Pending`.
    pub status: Option<String>,
    pub payment_date: Option<Date>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractHistory {
    pub id: DbId,
    pub contract_id: DbId,
    pub action: String,
    pub notes: Option<String>,
    pub changed_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Dashboard figures for the contracts landing page.
#[derive(Debug, Clone, Serialize)]
pub struct ContractDashboard {
    pub active_count: i64,
    pub expiring_soon_count: i64,
    pub pending_approvals: i64,
    pub total_active_value: f64,
    pub expiring_soon: Vec<Contract>,
    pub recent: Vec<Contract>,
}

/// Per-status totals for the contract report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractStatusTotal {
    pub status: String,
    pub contract_count: i64,
    pub total_value: f64,
}

/// Per-vendor totals for the contract report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VendorTotal {
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<String>,
    pub contract_count: i64,
    pub total_value: f64,
}

// ---------------------------------------------------------------------------
// Vendors and contract types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertVendor {
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "Vendor name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertContractType {
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "Contract type name is required"))]
    pub name: String,
    pub description: Option<String>,
}
