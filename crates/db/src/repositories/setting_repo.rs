//! Repository for the `settings` key/value table.

use sqlx::PgPool;

use crate::models::setting::Setting;

const COLUMNS: &str = "id, key, value, updated_at";

pub struct SettingRepo;

impl SettingRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings ORDER BY key");
        sqlx::query_as::<_, Setting>(&query).fetch_all(pool).await
    }

    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE key = $1");
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the value stored under `key`.
    pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (key, value) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_settings_key DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
