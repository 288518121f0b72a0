//! Spool-file mailer for development and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{MailError, Mailer};

/// Appends each message to a text file as a delimited block:
///
/// ```text
/// --- EMAIL SENT AT 2026-10-19 09:30:00 ---
/// To: user@example.com
/// Subject: Ticket #4 Updated
/// Body:
/// ...
/// ------------------------------------
/// ```
pub struct FileMailer {
    path: PathBuf,
    // Serializes appends so concurrent blocks never interleave.
    lock: Mutex<()>,
}

impl FileMailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render one spool block.
pub fn format_entry(sent_at: chrono::DateTime<chrono::Local>, to: &str, subject: &str, body: &str) -> String {
    format!(
        "--- EMAIL SENT AT {} ---\nTo: {to}\nSubject: {subject}\nBody:\n{body}\n------------------------------------\n\n",
        sent_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

#[async_trait]
impl Mailer for FileMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let entry = format_entry(chrono::Local::now(), to, subject, body);

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(to, subject, path = %self.path.display(), "Email spooled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_blocks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mailer = FileMailer::new(dir.path().join("mail.txt"));

        mailer.send("a@example.com", "First", "one").await.unwrap();
        mailer.send("b@example.com", "Second", "two").await.unwrap();

        let content = tokio::fs::read_to_string(mailer.path()).await.unwrap();
        assert_eq!(content.matches("--- EMAIL SENT AT").count(), 2);
        let first = content.find("Subject: First").unwrap();
        let second = content.find("Subject: Second").unwrap();
        assert!(first < second);
        assert!(content.contains("To: b@example.com\nSubject: Second\nBody:\ntwo\n"));
    }

    #[test]
    fn entry_format_matches_spool_layout() {
        use chrono::TimeZone;
        let at = chrono::Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let entry = format_entry(at, "x@example.com", "Hi", "Body text");
        assert!(entry.starts_with("--- EMAIL SENT AT 2026-01-02 03:04:05 ---\n"));
        assert!(entry.ends_with("------------------------------------\n\n"));
    }
}
