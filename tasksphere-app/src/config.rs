//! Configuration management for the TaskSphere client
//!
//! This module loads configuration from environment variables (and a `.env`
//! file when present) into a type-safe configuration struct.
//!
//! # Environment Variables
//!
//! - `TASKSPHERE_API_URL`: Backend base URL (default: http://localhost:8080)
//! - `TASKSPHERE_TOKEN_PATH`: File holding the session token (default: .tasksphere/token)
//! - `TASKSPHERE_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
//! - `TASKSPHERE_LOG_JSON`: Emit JSON logs when set to `1` or `true`
//! - `RUST_LOG`: Log filter (default: tasksphere_app=info,tasksphere_client=info)
//!
//! # Example
//!
//! ```no_run
//! use tasksphere_app::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Talking to {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TOKEN_PATH: &str = ".tasksphere/token";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    pub api: ApiConfig,

    /// Session token persistence
    pub storage: StorageConfig,

    /// Log output
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Token storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File the session token is persisted to
    pub token_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Use the JSON formatter instead of the human-readable one
    pub json: bool,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TASKSPHERE_API_URL` is not an http(s) URL
    /// - `TASKSPHERE_REQUEST_TIMEOUT_SECS` is not a positive integer
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TASKSPHERE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("TASKSPHERE_API_URL must start with http:// or https://");
        }

        let request_timeout_secs = match lookup("TASKSPHERE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("TASKSPHERE_REQUEST_TIMEOUT_SECS is not a number: {}", e)
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        if request_timeout_secs == 0 {
            anyhow::bail!("TASKSPHERE_REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        let token_path = lookup("TASKSPHERE_TOKEN_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

        let json = lookup("TASKSPHERE_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout_secs,
            },
            storage: StorageConfig { token_path },
            logging: LoggingConfig { json },
        })
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.token_path, PathBuf::from(".tasksphere/token"));
        assert!(!config.logging.json);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TASKSPHERE_API_URL", "https://tasks.example.com/"),
            ("TASKSPHERE_TOKEN_PATH", "/tmp/tok"),
            ("TASKSPHERE_REQUEST_TIMEOUT_SECS", "5"),
            ("TASKSPHERE_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url, "https://tasks.example.com");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.storage.token_path, PathBuf::from("/tmp/tok"));
        assert!(config.logging.json);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::from_lookup(lookup(&[("TASKSPHERE_REQUEST_TIMEOUT_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let result = Config::from_lookup(lookup(&[("TASKSPHERE_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let result = Config::from_lookup(lookup(&[("TASKSPHERE_API_URL", "localhost:8080")]));
        assert!(result.is_err());
    }
}
