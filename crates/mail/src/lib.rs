//! Outbound email for ServiceCore.
//!
//! [`Mailer`] is the seam the API depends on. [`SmtpMailer`] delivers
//! through an SMTP relay; [`FileMailer`] appends each message to a local
//! spool file and is used whenever SMTP is not configured.

use std::sync::Arc;

pub mod file;
pub mod smtp;

pub use file::FileMailer;
pub use smtp::{EmailConfig, SmtpMailer};

/// Spool file used when `EMAIL_LOG_PATH` is unset.
pub const DEFAULT_EMAIL_LOG_PATH: &str = "email_log.txt";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The spool file could not be written.
    #[error("Email spool error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends a plain-text email.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Pick a mailer from the environment: SMTP when `SMTP_HOST` is set,
/// otherwise a [`FileMailer`] writing to `EMAIL_LOG_PATH`.
pub fn mailer_from_env() -> Arc<dyn Mailer> {
    match EmailConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, "Using SMTP mailer");
            Arc::new(SmtpMailer::new(config))
        }
        None => {
            let path = std::env::var("EMAIL_LOG_PATH")
                .unwrap_or_else(|_| DEFAULT_EMAIL_LOG_PATH.to_string());
            tracing::info!(path = %path, "SMTP_HOST not set, spooling email to file");
            Arc::new(FileMailer::new(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn mail_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
