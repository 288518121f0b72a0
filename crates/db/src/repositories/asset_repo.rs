//! Repository for the `assets` table and its assignment, maintenance and
//! history logs.

use sqlx::{PgPool, Postgres, QueryBuilder};
use servicecore_core::assets::{
    HISTORY_ASSIGNMENT, HISTORY_MAINTENANCE, HISTORY_REGISTRATION, STATUS_AVAILABLE,
    STATUS_IN_USE,
};
use servicecore_core::types::DbId;

use crate::models::asset::{
    Asset, AssetAssignment, AssetCategory, AssetFilter, AssetHistory, AssetMaintenance,
    AssignAsset, CreateAsset, LogMaintenance, NewAssetHistory, UpdateAsset,
};

/// Joined projection used by every asset read.
const SELECT: &str = "SELECT a.id, a.name, a.asset_tag, a.serial_number, \
     a.category_id, c.name AS category_name, \
     a.department_id, d.name AS department_name, \
     a.assigned_user_id, u.name AS assigned_user_name, \
     a.status, a.purchase_date, a.purchase_cost, a.warranty_expiry, \
     a.location, a.notes, a.created_at, a.updated_at \
     FROM assets a \
     LEFT JOIN asset_categories c ON c.id = a.category_id \
     LEFT JOIN departments d ON d.id = a.department_id \
     LEFT JOIN users u ON u.id = a.assigned_user_id";

const COUNT: &str = "SELECT COUNT(*) FROM assets a";

const HISTORY_COLUMNS: &str =
    "id, asset_id, action, old_status, new_status, notes, performed_by, created_at";

const MAINTENANCE_COLUMNS: &str = "id, asset_id, maintenance_type, description, cost, \
     performed_by, maintenance_date, next_due_date, created_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Register an asset and write its `Registration` history row.
    pub async fn create(
        pool: &PgPool,
        performed_by: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let (id, status): (DbId, String) = sqlx::query_as(
            "INSERT INTO assets
                (name, asset_tag, serial_number, category_id, department_id, status,
                 purchase_date, purchase_cost, warranty_expiry, location, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, $12), $7, $8, $9, $10, $11)
             RETURNING id, status",
        )
        .bind(&input.name)
        .bind(&input.asset_tag)
        .bind(&input.serial_number)
        .bind(input.category_id)
        .bind(input.department_id)
        .bind(&input.status)
        .bind(input.purchase_date)
        .bind(input.purchase_cost)
        .bind(input.warranty_expiry)
        .bind(&input.location)
        .bind(&input.notes)
        .bind(STATUS_AVAILABLE)
        .fetch_one(&mut *tx)
        .await?;

        insert_history(
            &mut tx,
            &NewAssetHistory {
                asset_id: id,
                action: HISTORY_REGISTRATION,
                old_status: None,
                new_status: Some(&status),
                notes: None,
                performed_by,
            },
        )
        .await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("{SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &AssetFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<Asset>().fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool, filter: &AssetFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT);
        push_filter(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assets SET
                name = COALESCE($2, name),
                asset_tag = COALESCE($3, asset_tag),
                serial_number = COALESCE($4, serial_number),
                category_id = COALESCE($5, category_id),
                department_id = COALESCE($6, department_id),
                status = COALESCE($7, status),
                purchase_date = COALESCE($8, purchase_date),
                purchase_cost = COALESCE($9, purchase_cost),
                warranty_expiry = COALESCE($10, warranty_expiry),
                location = COALESCE($11, location),
                notes = COALESCE($12, notes)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.asset_tag)
        .bind(&input.serial_number)
        .bind(input.category_id)
        .bind(input.department_id)
        .bind(&input.status)
        .bind(input.purchase_date)
        .bind(input.purchase_cost)
        .bind(input.warranty_expiry)
        .bind(&input.location)
        .bind(&input.notes)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn categories(pool: &PgPool) -> Result<Vec<AssetCategory>, sqlx::Error> {
        sqlx::query_as::<_, AssetCategory>(
            "SELECT id, name, description FROM asset_categories ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Hand an asset to a user.
    ///
    /// Closes any open assignment, opens a new one, marks the asset
    /// `In Use` and records an `Assignment` history row, all in one
    /// transaction.
    pub async fn assign(
        pool: &PgPool,
        asset_id: DbId,
        old_status: &str,
        assigned_by: DbId,
        input: &AssignAsset,
    ) -> Result<AssetAssignment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE asset_assignments SET returned_at = NOW()
             WHERE asset_id = $1 AND returned_at IS NULL",
        )
        .bind(asset_id)
        .execute(&mut *tx)
        .await?;

        let assignment = sqlx::query_as::<_, AssetAssignment>(
            "INSERT INTO asset_assignments (asset_id, user_id, assigned_by, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING id, asset_id, user_id, assigned_by, assigned_at, returned_at, notes",
        )
        .bind(asset_id)
        .bind(input.user_id)
        .bind(assigned_by)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE assets SET assigned_user_id = $2, status = $3 WHERE id = $1")
            .bind(asset_id)
            .bind(input.user_id)
            .bind(STATUS_IN_USE)
            .execute(&mut *tx)
            .await?;

        let notes = format!("Assigned to user {}", input.user_id);
        insert_history(
            &mut tx,
            &NewAssetHistory {
                asset_id,
                action: HISTORY_ASSIGNMENT,
                old_status: Some(old_status),
                new_status: Some(STATUS_IN_USE),
                notes: Some(&notes),
                performed_by: assigned_by,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    pub async fn assignments(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssetAssignment>, sqlx::Error> {
        sqlx::query_as::<_, AssetAssignment>(
            "SELECT id, asset_id, user_id, assigned_by, assigned_at, returned_at, notes
             FROM asset_assignments WHERE asset_id = $1 ORDER BY assigned_at DESC, id DESC",
        )
        .bind(asset_id)
        .fetch_all(pool)
        .await
    }

    /// Record a maintenance entry and a `Maintenance` history row.
    pub async fn log_maintenance(
        pool: &PgPool,
        asset_id: DbId,
        status: &str,
        performed_by: DbId,
        input: &LogMaintenance,
    ) -> Result<AssetMaintenance, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO asset_maintenances
                (asset_id, maintenance_type, description, cost, performed_by,
                 maintenance_date, next_due_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, CURRENT_DATE), $7)
             RETURNING {MAINTENANCE_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, AssetMaintenance>(&query)
            .bind(asset_id)
            .bind(&input.maintenance_type)
            .bind(&input.description)
            .bind(input.cost)
            .bind(&input.performed_by)
            .bind(input.maintenance_date)
            .bind(input.next_due_date)
            .fetch_one(&mut *tx)
            .await?;

        insert_history(
            &mut tx,
            &NewAssetHistory {
                asset_id,
                action: HISTORY_MAINTENANCE,
                old_status: Some(status),
                new_status: Some(status),
                notes: Some(&input.maintenance_type),
                performed_by,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(entry)
    }

    pub async fn maintenances(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssetMaintenance>, sqlx::Error> {
        let query = format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM asset_maintenances
             WHERE asset_id = $1 ORDER BY maintenance_date DESC, id DESC"
        );
        sqlx::query_as::<_, AssetMaintenance>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    pub async fn add_history(
        pool: &PgPool,
        entry: &NewAssetHistory<'_>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        insert_history(&mut tx, entry).await?;
        tx.commit().await
    }

    /// History for an asset, newest first.
    pub async fn history(pool: &PgPool, asset_id: DbId) -> Result<Vec<AssetHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM asset_histories
             WHERE asset_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AssetHistory>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}

async fn insert_history(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    entry: &NewAssetHistory<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO asset_histories
            (asset_id, action, old_status, new_status, notes, performed_by)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(entry.asset_id)
    .bind(entry.action)
    .bind(entry.old_status)
    .bind(entry.new_status)
    .bind(entry.notes)
    .bind(entry.performed_by)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AssetFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (a.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.asset_tag ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND a.category_id = ").push_bind(category_id);
    }
}
