use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every key has a default, so the CLI works out of the box against a
/// locally running backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the AI backend, including the `/api` prefix.
    pub api_base_url: String,
    /// Optional per-request timeout. `None` leaves the transport default in
    /// place, so a hung backend keeps the request pending until the user
    /// gives up.
    pub request_timeout: Option<Duration>,
    /// Override for the recent-resumes cache file location.
    pub recent_file: Option<PathBuf>,
    pub rust_log: String,
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = match std::env::var("SKILLSENSE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .context("SKILLSENSE_TIMEOUT_SECS must be a whole number of seconds")?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Config {
            api_base_url: std::env::var("SKILLSENSE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout,
            recent_file: std::env::var("SKILLSENSE_RECENT_FILE")
                .ok()
                .map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
