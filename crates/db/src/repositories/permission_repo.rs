//! Repository for the `role_permissions` table.

use sqlx::PgPool;

use crate::models::role::RolePermission;

const COLUMNS: &str = "id, role_name, feature_key, is_allowed, updated_at";

/// Provides lookups and upserts for role → feature grants.
pub struct PermissionRepo;

impl PermissionRepo {
    /// The stored flag for one role/feature pair, or `None` when no row exists.
    pub async fn lookup(
        pool: &PgPool,
        role_name: &str,
        feature_key: &str,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT is_allowed FROM role_permissions WHERE role_name = $1 AND feature_key = $2",
        )
        .bind(role_name)
        .bind(feature_key)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_role(
        pool: &PgPool,
        role_name: &str,
    ) -> Result<Vec<RolePermission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM role_permissions WHERE role_name = $1 ORDER BY feature_key"
        );
        sqlx::query_as::<_, RolePermission>(&query)
            .bind(role_name)
            .fetch_all(pool)
            .await
    }

    /// Insert a row only when none exists for the pair. Returns `true` when
    /// a row was inserted.
    pub async fn insert_if_missing(
        pool: &PgPool,
        role_name: &str,
        feature_key: &str,
        is_allowed: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO role_permissions (role_name, feature_key, is_allowed)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_role_permissions_role_feature DO NOTHING",
        )
        .bind(role_name)
        .bind(feature_key)
        .bind(is_allowed)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set many flags for a role in one transaction, inserting or updating
    /// as needed.
    pub async fn upsert_many(
        pool: &PgPool,
        role_name: &str,
        grants: &[(&str, bool)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (feature_key, is_allowed) in grants {
            sqlx::query(
                "INSERT INTO role_permissions (role_name, feature_key, is_allowed)
                 VALUES ($1, $2, $3)
                 ON CONFLICT ON CONSTRAINT uq_role_permissions_role_feature
                 DO UPDATE SET is_allowed = EXCLUDED.is_allowed",
            )
            .bind(role_name)
            .bind(feature_key)
            .bind(is_allowed)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}
