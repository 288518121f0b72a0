use std::path::PathBuf;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for uploaded attachments (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Email of the bootstrap admin account created by the seeder.
    pub seed_admin_email: String,
    /// Plaintext password for the bootstrap admin; hashed before storage.
    pub seed_admin_password: String,
    /// Session cookie / token configuration.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `SEED_ADMIN_EMAIL`     | `admin@servicecore.local`  |
    /// | `SEED_ADMIN_PASSWORD`  | `admin`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
        );

        let seed_admin_email = std::env::var("SEED_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@servicecore.local".into());
        let seed_admin_password =
            std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            seed_admin_email,
            seed_admin_password,
            session: SessionConfig::from_env(),
        }
    }
}
