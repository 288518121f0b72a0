//! Multipart attachment intake shared by tickets, tasks, contracts and
//! solutions.
//!
//! Files are buffered, checked as a batch, then written to
//! `{upload_dir}/{owner directory}/{uuid}_{name}` with one row per file.

use axum::body::Bytes;
use axum::extract::Multipart;
use servicecore_core::types::DbId;
use servicecore_core::uploads::{
    sanitize_file_name, stored_file_name, validate_batch, MAX_FILES_PER_REQUEST, MAX_FILE_BYTES,
};
use servicecore_db::models::attachment::{Attachment, AttachmentOwner, NewAttachment};
use servicecore_db::repositories::AttachmentRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body limit for upload routes: a full batch plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES_PER_REQUEST * MAX_FILE_BYTES + 1024 * 1024;

struct IncomingFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_files(multipart: &mut Multipart) -> AppResult<Vec<IncomingFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        // Plain form fields carry no file name.
        let Some(file_name) = field.file_name().map(sanitize_file_name) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            continue;
        }
        files.push(IncomingFile {
            file_name,
            content_type,
            data,
        });
    }
    Ok(files)
}

/// Store every file in the request against `owner_id`.
pub async fn save_attachments(
    state: &AppState,
    owner: AttachmentOwner,
    owner_id: DbId,
    uploaded_by: DbId,
    mut multipart: Multipart,
) -> AppResult<Vec<Attachment>> {
    let files = read_files(&mut multipart).await?;
    let sizes: Vec<usize> = files.iter().map(|f| f.data.len()).collect();
    validate_batch(&sizes)?;

    let dir = state.config.upload_dir.join(owner.directory());
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    let mut saved = Vec::with_capacity(files.len());
    for file in files {
        let stored = stored_file_name(&file.file_name);
        tokio::fs::write(dir.join(&stored), &file.data)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

        let attachment = AttachmentRepo::create(
            &state.pool,
            owner,
            &NewAttachment {
                owner_id,
                file_name: file.file_name,
                stored_path: format!("{}/{stored}", owner.directory()),
                content_type: file.content_type,
                size_bytes: file.data.len() as i64,
                uploaded_by,
            },
        )
        .await?;
        saved.push(attachment);
    }

    tracing::info!(
        owner = owner.directory(),
        owner_id,
        count = saved.len(),
        "Attachments stored"
    );
    Ok(saved)
}
