use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PROCESSING_URL: &str = "https://textify-ls6r.onrender.com/process";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_SESSIONS: usize = 1_000;
const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application configuration loaded from environment variables.
/// Every variable has a default except where noted; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub processing_url: String,
    /// `None` leaves the transport default in place.
    pub processing_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    /// Sessions beyond this count are refused until idle ones are evicted.
    pub max_sessions: usize,
    /// Sessions untouched for longer than this are evicted by the sweeper.
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
    /// `None` allows any origin.
    pub cors_allowed_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            processing_url: env_or("PROCESSING_URL", DEFAULT_PROCESSING_URL),
            processing_timeout: optional_secs("PROCESSING_TIMEOUT_SECS")?,
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| {
                    v.parse::<usize>()
                        .context("MAX_UPLOAD_BYTES must be a byte count")
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            max_sessions: optional_env("MAX_SESSIONS")
                .map(|v| v.parse::<usize>().context("MAX_SESSIONS must be a count"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_SESSIONS),
            session_idle_ttl: optional_secs("SESSION_IDLE_TTL_SECS")?
                .unwrap_or(DEFAULT_SESSION_IDLE_TTL),
            session_sweep_interval: optional_secs("SESSION_SWEEP_INTERVAL_SECS")?
                .unwrap_or(DEFAULT_SESSION_SWEEP_INTERVAL),
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            processing_url: DEFAULT_PROCESSING_URL.to_string(),
            processing_timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
            session_sweep_interval: DEFAULT_SESSION_SWEEP_INTERVAL,
            cors_allowed_origin: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn optional_secs(key: &str) -> Result<Option<Duration>> {
    optional_env(key)
        .map(|v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{key} must be a whole number of seconds"))
        })
        .transpose()
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
