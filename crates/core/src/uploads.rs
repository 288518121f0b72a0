//! Attachment limits and on-disk naming.

use crate::error::CoreError;

/// Maximum files accepted in a single upload request.
pub const MAX_FILES_PER_REQUEST: usize = 5;

/// Maximum size of a single file (10 MiB).
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Check a batch before anything is written to disk.
pub fn validate_batch(sizes: &[usize]) -> Result<(), CoreError> {
    if sizes.is_empty() {
        return Err(CoreError::Validation("No files were uploaded".into()));
    }
    if sizes.len() > MAX_FILES_PER_REQUEST {
        return Err(CoreError::Validation(format!(
            "At most {MAX_FILES_PER_REQUEST} files can be uploaded at once"
        )));
    }
    if sizes.iter().any(|&s| s > MAX_FILE_BYTES) {
        return Err(CoreError::Validation(
            "Each file must be 10 MB or smaller".into(),
        ));
    }
    Ok(())
}

/// Strip any directory components a client put in the file name.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned
    }
}

/// `{uuid}_{name}` so uploads never collide.
pub fn stored_file_name(original: &str) -> String {
    format!("{}_{}", uuid::Uuid::new_v4(), sanitize_file_name(original))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_limits() {
        assert!(validate_batch(&[1, 2, 3]).is_ok());
        assert!(validate_batch(&[]).is_err());
        assert!(validate_batch(&[1; 6]).is_err());
        assert!(validate_batch(&[MAX_FILE_BYTES]).is_ok());
        assert!(validate_batch(&[MAX_FILE_BYTES + 1]).is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\temp\\report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name(".."), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn test_stored_file_name_keeps_original_suffix() {
        let stored = stored_file_name("invoice.pdf");
        assert!(stored.ends_with("_invoice.pdf"));
        assert_eq!(stored.len(), 36 + 1 + "invoice.pdf".len());
    }
}
