//! Repository for the `vendors` and `contract_types` lookup tables.

use sqlx::PgPool;
use servicecore_core::types::DbId;

use crate::models::contract::{ContractType, UpsertContractType, UpsertVendor, Vendor};

const VENDOR_COLUMNS: &str =
    "id, name, contact_name, email, phone, address, created_at, updated_at";

pub struct VendorRepo;

impl VendorRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Vendor>, sqlx::Error> {
        let query = format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY name");
        sqlx::query_as::<_, Vendor>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert when `input.id` is `None`, otherwise update in place.
    ///
    /// Returns `None` when updating an id that does not exist.
    pub async fn upsert(pool: &PgPool, input: &UpsertVendor) -> Result<Option<Vendor>, sqlx::Error> {
        match input.id {
            None => {
                let query = format!(
                    "INSERT INTO vendors (name, contact_name, email, phone, address)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING {VENDOR_COLUMNS}"
                );
                sqlx::query_as::<_, Vendor>(&query)
                    .bind(&input.name)
                    .bind(&input.contact_name)
                    .bind(&input.email)
                    .bind(&input.phone)
                    .bind(&input.address)
                    .fetch_one(pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let query = format!(
                    "UPDATE vendors SET name = $2, contact_name = $3, email = $4,
                        phone = $5, address = $6
                     WHERE id = $1
                     RETURNING {VENDOR_COLUMNS}"
                );
                sqlx::query_as::<_, Vendor>(&query)
                    .bind(id)
                    .bind(&input.name)
                    .bind(&input.contact_name)
                    .bind(&input.email)
                    .bind(&input.phone)
                    .bind(&input.address)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct ContractTypeRepo;

impl ContractTypeRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ContractType>, sqlx::Error> {
        sqlx::query_as::<_, ContractType>(
            "SELECT id, name, description FROM contract_types ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert when `input.id` is `None`, otherwise update in place.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertContractType,
    ) -> Result<Option<ContractType>, sqlx::Error> {
        match input.id {
            None => sqlx::query_as::<_, ContractType>(
                "INSERT INTO contract_types (name, description) VALUES ($1, $2)
                 RETURNING id, name, description",
            )
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
            .map(Some),
            Some(id) => sqlx::query_as::<_, ContractType>(
                "UPDATE contract_types SET name = $2, description = $3 WHERE id = $1
                 RETURNING id, name, description",
            )
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await,
        }
    }
}
