use std::path::PathBuf;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, e.g. `https://api.jobscope.io`.
    pub api_base_url: String,
    /// Directory holding persisted client state (session record, search
    /// history). Survives restarts; wiped on logout/withdrawal.
    pub state_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let state_dir = match std::env::var("CLIENT_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_state_dir()?,
        };

        Ok(Config {
            api_base_url: require_env("API_BASE_URL")?,
            state_dir,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_state_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("could not determine a platform data directory")?;
    Ok(base.join("jobscope"))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
