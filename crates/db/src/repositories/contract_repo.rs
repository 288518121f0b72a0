//! Repository for the `contracts` table and its approval, payment and
//! history logs.

use sqlx::PgPool;
use servicecore_core::contracts::{
    DEFAULT_CURRENCY, PAYMENT_PENDING, STATUS_ACTIVE, STATUS_DRAFT, STATUS_PENDING_APPROVAL,
};
use servicecore_core::types::{Date, DbId};

use crate::models::contract::{
    Contract, ContractApproval, ContractHistory, ContractPayment, ContractStatusTotal,
    CreateContract, CreatePayment, UpdateContract, VendorTotal,
};

/// Joined projection used by every contract read.
const SELECT: &str = "SELECT c.id, c.contract_number, c.title, c.description, \
     c.vendor_id, v.name AS vendor_name, \
     c.contract_type_id, ct.name AS contract_type_name, \
     c.status, c.start_date, c.end_date, c.value, c.currency, \
     c.owner_id, c.created_by, c.created_at, c.updated_at \
     FROM contracts c \
     LEFT JOIN vendors v ON v.id = c.vendor_id \
     LEFT JOIN contract_types ct ON ct.id = c.contract_type_id";

const PAYMENT_COLUMNS: &str =
    "id, contract_id, due_date, amount, status, payment_date, reference, created_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a contract in `Draft`.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO contracts
                (contract_number, title, description, vendor_id, contract_type_id, status,
                 start_date, end_date, value, currency, owner_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, $11), COALESCE($12, $13), $13)
             RETURNING id",
        )
        .bind(&input.contract_number)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.vendor_id)
        .bind(input.contract_type_id)
        .bind(STATUS_DRAFT)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.value)
        .bind(&input.currency)
        .bind(DEFAULT_CURRENCY)
        .bind(input.owner_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts, optionally by status, newest first.
    pub async fn list(pool: &PgPool, status: Option<&str>) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE ($1::TEXT IS NULL OR c.status = $1)
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contracts SET
                contract_number = COALESCE($2, contract_number),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                vendor_id = COALESCE($5, vendor_id),
                contract_type_id = COALESCE($6, contract_type_id),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                value = COALESCE($9, value),
                currency = COALESCE($10, currency),
                owner_id = COALESCE($11, owner_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.contract_number)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.vendor_id)
        .bind(input.contract_type_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.value)
        .bind(&input.currency)
        .bind(input.owner_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn set_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE contracts SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a contract to `status` and record the decision, in one
    /// transaction.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        status: &str,
        approver_id: DbId,
        decision: &str,
        comments: Option<&str>,
    ) -> Result<ContractApproval, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE contracts SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *tx)
            .await?;
        let approval = sqlx::query_as::<_, ContractApproval>(
            "INSERT INTO contract_approvals (contract_id, approver_id, decision, comments)
             VALUES ($1, $2, $3, $4)
             RETURNING id, contract_id, approver_id, decision, comments, decided_at",
        )
        .bind(id)
        .bind(approver_id)
        .bind(decision)
        .bind(comments)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(approval)
    }

    pub async fn approvals(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<ContractApproval>, sqlx::Error> {
        sqlx::query_as::<_, ContractApproval>(
            "SELECT id, contract_id, approver_id, decision, comments, decided_at
             FROM contract_approvals WHERE contract_id = $1 ORDER BY decided_at DESC, id DESC",
        )
        .bind(contract_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    pub async fn add_payment(
        pool: &PgPool,
        contract_id: DbId,
        input: &CreatePayment,
    ) -> Result<ContractPayment, sqlx::Error> {
        let query = format!(
            "INSERT INTO contract_payments
                (contract_id, due_date, amount, status, payment_date, reference)
             VALUES ($1, $2, $3, COALESCE($4, $7), $5, $6)
             RETURNING {PAYMENT_COLUMNS}"
        );
        sqlx::query_as::<_, ContractPayment>(&query)
            .bind(contract_id)
            .bind(input.due_date)
            .bind(input.amount)
            .bind(&input.status)
            .bind(input.payment_date)
            .bind(&input.reference)
            .bind(PAYMENT_PENDING)
            .fetch_one(pool)
            .await
    }

    pub async fn payments(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<ContractPayment>, sqlx::Error> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM contract_payments
             WHERE contract_id = $1 ORDER BY due_date, id"
        );
        sqlx::query_as::<_, ContractPayment>(&query)
            .bind(contract_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub async fn add_history(
        pool: &PgPool,
        contract_id: DbId,
        action: &str,
        notes: Option<&str>,
        changed_by: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO contract_histories (contract_id, action, notes, changed_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(contract_id)
        .bind(action)
        .bind(notes)
        .bind(changed_by)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// History for a contract, newest first.
    pub async fn history(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<ContractHistory>, sqlx::Error> {
        sqlx::query_as::<_, ContractHistory>(
            "SELECT id, contract_id, action, notes, changed_by, created_at
             FROM contract_histories WHERE contract_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(contract_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Dashboard and reports
    // -----------------------------------------------------------------------

    /// `(count, total value)` of active contracts.
    pub async fn active_totals(pool: &PgPool) -> Result<(i64, f64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(value), 0)::DOUBLE PRECISION
             FROM contracts WHERE status = $1",
        )
        .bind(STATUS_ACTIVE)
        .fetch_one(pool)
        .await
    }

    /// Active contracts ending on or before `until`, soonest first. Active
    /// contracts already past their end date are included.
    pub async fn expiring_by(pool: &PgPool, until: Date) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE c.status = $1 AND c.end_date <= $2
             ORDER BY c.end_date, c.id"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(STATUS_ACTIVE)
            .bind(until)
            .fetch_all(pool)
            .await
    }

    /// Contracts waiting for an approval decision.
    pub async fn count_pending_approval(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE status = $1")
            .bind(STATUS_PENDING_APPROVAL)
            .fetch_one(pool)
            .await
    }

    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY c.created_at DESC, c.id DESC LIMIT $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn totals_by_status(pool: &PgPool) -> Result<Vec<ContractStatusTotal>, sqlx::Error> {
        sqlx::query_as::<_, ContractStatusTotal>(
            "SELECT status, COUNT(*) AS contract_count,
                    COALESCE(SUM(value), 0)::DOUBLE PRECISION AS total_value
             FROM contracts GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn totals_by_vendor(pool: &PgPool) -> Result<Vec<VendorTotal>, sqlx::Error> {
        sqlx::query_as::<_, VendorTotal>(
            "SELECT c.vendor_id, v.name AS vendor_name, COUNT(*) AS contract_count,
                    COALESCE(SUM(c.value), 0)::DOUBLE PRECISION AS total_value
             FROM contracts c LEFT JOIN vendors v ON v.id = c.vendor_id
             GROUP BY c.vendor_id, v.name
             ORDER BY total_value DESC",
        )
        .fetch_all(pool)
        .await
    }
}
