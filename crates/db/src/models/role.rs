//! Roles, departments and the role → feature permission table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use servicecore_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A row from the `role_permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RolePermission {
    pub id: DbId,
    pub role_name: String,
    pub feature_key: String,
    pub is_allowed: bool,
    pub updated_at: Timestamp,
}

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Upsert DTO: with `id` updates that department, without inserts one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertDepartment {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "Department name is required"))]
    pub name: String,
    pub description: Option<String>,
}
