//! Repository for the `*_attachments` tables.

use sqlx::PgPool;
use servicecore_core::types::DbId;

use crate::models::attachment::{Attachment, AttachmentOwner, NewAttachment};

/// Provides inserts and listings for attachments of any owner kind.
pub struct AttachmentRepo;

impl AttachmentRepo {
    pub async fn create(
        pool: &PgPool,
        owner: AttachmentOwner,
        input: &NewAttachment,
    ) -> Result<Attachment, sqlx::Error> {
        let (table, column) = (owner.table(), owner.owner_column());
        let query = format!(
            "INSERT INTO {table} ({column}, file_name, stored_path, content_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, {column} AS owner_id, file_name, stored_path, content_type,
                       size_bytes, uploaded_by, created_at"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(input.owner_id)
            .bind(&input.file_name)
            .bind(&input.stored_path)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        owner: AttachmentOwner,
        owner_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let (table, column) = (owner.table(), owner.owner_column());
        let query = format!(
            "SELECT id, {column} AS owner_id, file_name, stored_path, content_type,
                    size_bytes, uploaded_by, created_at
             FROM {table} WHERE {column} = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
