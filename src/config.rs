use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/jobs";

/// Application configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Base URL of the remote job service, e.g. http://localhost:5000/api/jobs
    pub api_url: String,

    /// Jobs per page
    /// Default: 10
    pub page_size: u32,

    /// Per-request timeout
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Directory for rotated log files
    /// Default: logs
    pub log_dir: String,

    /// Listen address of the reference server
    /// Default: 127.0.0.1:5000
    pub bind_addr: String,

    /// Maximum payload size accepted by the reference server (in bytes)
    /// Default: 1MB
    pub max_payload_size: usize,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a number, got '{}'", key, raw)),
        _ => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - JOB_API_URL: remote job service base URL (default: http://localhost:5000/api/jobs)
    /// - PAGE_SIZE: jobs per page, at least 1 (default: 10)
    /// - REQUEST_TIMEOUT_SECS: per-request timeout (default: 30)
    /// - LOG_DIR: log file directory (default: logs)
    /// - BIND_ADDR: reference server listen address (default: 127.0.0.1:5000)
    /// - MAX_PAYLOAD_SIZE: reference server payload limit in bytes (default: 1048576)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let api_url = lookup("JOB_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let page_size: u32 = parse_or(&lookup, "PAGE_SIZE", 10)?;
        if page_size == 0 {
            return Err("PAGE_SIZE must be at least 1".to_string());
        }

        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let log_dir = lookup("LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "logs".to_string());

        let bind_addr = lookup("BIND_ADDR")
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| "127.0.0.1:5000".to_string());

        let max_payload_size = parse_or(&lookup, "MAX_PAYLOAD_SIZE", 1024 * 1024)?;

        Ok(Config {
            api_url,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            log_dir,
            bind_addr,
            max_payload_size,
        })
    }
}
