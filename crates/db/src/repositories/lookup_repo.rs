//! Repository for ticket lookup tables: statuses, priorities, categories.

use sqlx::PgPool;
use servicecore_core::types::DbId;

use crate::models::ticket::{
    TicketCategory, TicketPriority, TicketStatus, UpsertCategory, UpsertPriority,
};

const CATEGORY_COLUMNS: &str = "id, name, description, parent_id";

/// Provides reads and admin upserts for ticket lookups.
pub struct LookupRepo;

impl LookupRepo {
    pub async fn statuses(pool: &PgPool) -> Result<Vec<TicketStatus>, sqlx::Error> {
        sqlx::query_as::<_, TicketStatus>(
            "SELECT id, name, sort_order FROM ticket_statuses ORDER BY sort_order, id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_status(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketStatus>, sqlx::Error> {
        sqlx::query_as::<_, TicketStatus>(
            "SELECT id, name, sort_order FROM ticket_statuses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_status_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<TicketStatus>, sqlx::Error> {
        sqlx::query_as::<_, TicketStatus>(
            "SELECT id, name, sort_order FROM ticket_statuses WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn priorities(pool: &PgPool) -> Result<Vec<TicketPriority>, sqlx::Error> {
        sqlx::query_as::<_, TicketPriority>(
            "SELECT id, name, level FROM ticket_priorities ORDER BY level, id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_priority(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketPriority>, sqlx::Error> {
        sqlx::query_as::<_, TicketPriority>(
            "SELECT id, name, level FROM ticket_priorities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn upsert_priority(
        pool: &PgPool,
        input: &UpsertPriority,
    ) -> Result<Option<TicketPriority>, sqlx::Error> {
        match input.id {
            None => sqlx::query_as::<_, TicketPriority>(
                "INSERT INTO ticket_priorities (name, level) VALUES ($1, COALESCE($2, 0))
                 RETURNING id, name, level",
            )
            .bind(input.name.trim())
            .bind(input.level)
            .fetch_one(pool)
            .await
            .map(Some),
            Some(id) => sqlx::query_as::<_, TicketPriority>(
                "UPDATE ticket_priorities SET name = $2, level = COALESCE($3, level)
                 WHERE id = $1 RETURNING id, name, level",
            )
            .bind(id)
            .bind(input.name.trim())
            .bind(input.level)
            .fetch_optional(pool)
            .await,
        }
    }

    pub async fn categories(pool: &PgPool) -> Result<Vec<TicketCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM ticket_categories ORDER BY name, id");
        sqlx::query_as::<_, TicketCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM ticket_categories WHERE id = $1");
        sqlx::query_as::<_, TicketCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert_category(
        pool: &PgPool,
        input: &UpsertCategory,
    ) -> Result<Option<TicketCategory>, sqlx::Error> {
        match input.id {
            None => {
                let query = format!(
                    "INSERT INTO ticket_categories (name, description, parent_id)
                     VALUES ($1, $2, $3) RETURNING {CATEGORY_COLUMNS}"
                );
                sqlx::query_as::<_, TicketCategory>(&query)
                    .bind(input.name.trim())
                    .bind(&input.description)
                    .bind(input.parent_id)
                    .fetch_one(pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let query = format!(
                    "UPDATE ticket_categories SET name = $2, description = $3, parent_id = $4
                     WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
                );
                sqlx::query_as::<_, TicketCategory>(&query)
                    .bind(id)
                    .bind(input.name.trim())
                    .bind(&input.description)
                    .bind(input.parent_id)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Whether the category has child categories or tickets referencing it.
    pub async fn category_in_use(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ticket_categories WHERE parent_id = $1)
                 OR EXISTS(SELECT 1 FROM tickets WHERE category_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_category(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ticket_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
