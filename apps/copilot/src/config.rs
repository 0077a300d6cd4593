use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client configuration loaded from environment variables.
/// Every variable has a default, so a bare environment yields a working local setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("COPILOT_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            state_dir: std::env::var_os("COPILOT_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_state_dir),
            http_timeout_secs: match std::env::var("COPILOT_HTTP_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("COPILOT_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            state_dir: default_state_dir(),
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            rust_log: "info".to_string(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".copilot")
        .join("state")
}
