//! Configuration module for the StudyGuard client.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `STUDYGUARD_SERVER_URL` | No | `http://127.0.0.1:5000` | Study service base URL |
//! | `STUDYGUARD_WORK_SECS` | No | 1500 | Length of a work phase |
//! | `STUDYGUARD_BREAK_SECS` | No | 300 | Length of a break phase |
//! | `STUDYGUARD_QUOTE_POLL_MS` | No | 1000 | Quote poll period |
//! | `STUDYGUARD_SUGGESTION_POLL_MS` | No | 5000 | Break-suggestion poll period |
//! | `STUDYGUARD_REQUEST_TIMEOUT_SECS` | No | 10 | HTTP request timeout |
//! | `STUDYGUARD_LOG_FILE` | No | - | Log file used by the interactive view |
//!
//! # Example
//!
//! ```no_run
//! use studyguard_client::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Server URL: {}", config.server_url);
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::session::{Durations, BREAK_DURATION_SECS, WORK_DURATION_SECS};

/// Default study service URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default quote poll period in milliseconds.
const DEFAULT_QUOTE_POLL_MS: u64 = 1000;

/// Default break-suggestion poll period in milliseconds.
const DEFAULT_SUGGESTION_POLL_MS: u64 = 5000;

/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Clock resolution. Not configurable from the environment.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the StudyGuard client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the study service, without a trailing slash.
    pub server_url: String,

    /// Work and break phase lengths.
    pub durations: Durations,

    /// Period between clock ticks.
    pub tick_period: Duration,

    /// Period of the quote poller.
    pub quote_poll: Duration,

    /// Period of the break-suggestion poller.
    pub suggestion_poll: Duration,

    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,

    /// Where the interactive view writes its logs. `None` discards them.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration with default timings for the given server.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: normalize_url(server_url.into()),
            durations: Durations::default(),
            tick_period: TICK_PERIOD,
            quote_poll: Duration::from_millis(DEFAULT_QUOTE_POLL_MS),
            suggestion_poll: Duration::from_millis(DEFAULT_SUGGESTION_POLL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file: None,
        }
    }

    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any numeric variable is set but is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            env::var("STUDYGUARD_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let work_secs = parse_positive("STUDYGUARD_WORK_SECS", u64::from(WORK_DURATION_SECS))?;
        let break_secs = parse_positive("STUDYGUARD_BREAK_SECS", u64::from(BREAK_DURATION_SECS))?;
        let quote_ms = parse_positive("STUDYGUARD_QUOTE_POLL_MS", DEFAULT_QUOTE_POLL_MS)?;
        let suggestion_ms =
            parse_positive("STUDYGUARD_SUGGESTION_POLL_MS", DEFAULT_SUGGESTION_POLL_MS)?;
        let timeout_secs =
            parse_positive("STUDYGUARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let log_file = env::var("STUDYGUARD_LOG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            durations: Durations {
                work_secs: to_secs("STUDYGUARD_WORK_SECS", work_secs)?,
                break_secs: to_secs("STUDYGUARD_BREAK_SECS", break_secs)?,
            },
            quote_poll: Duration::from_millis(quote_ms),
            suggestion_poll: Duration::from_millis(suggestion_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            log_file,
            ..Self::new(server_url)
        })
    }

    /// Replaces the server URL (used by the `--server-url` flag).
    #[must_use]
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = normalize_url(server_url.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_positive(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let parsed = val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected positive integer, got '{val}'"),
            })?;
            if parsed == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "value must be greater than 0".to_string(),
                });
            }
            Ok(parsed)
        }
        Err(_) => Ok(default),
    }
}

fn to_secs(key: &str, value: u64) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{value} seconds is out of range"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "STUDYGUARD_SERVER_URL",
        "STUDYGUARD_WORK_SECS",
        "STUDYGUARD_BREAK_SECS",
        "STUDYGUARD_QUOTE_POLL_MS",
        "STUDYGUARD_SUGGESTION_POLL_MS",
        "STUDYGUARD_REQUEST_TIMEOUT_SECS",
        "STUDYGUARD_LOG_FILE",
    ];

    /// Saves the study variables and restores them on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clean() -> Self {
            let saved = VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
            for key in VARS {
                env::remove_var(key);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_when_nothing_is_set() {
        let _guard = EnvGuard::clean();

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.durations.work_secs, 1500);
        assert_eq!(config.durations.break_secs, 300);
        assert_eq!(config.quote_poll, Duration::from_secs(1));
        assert_eq!(config.suggestion_poll, Duration::from_secs(5));
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert!(config.log_file.is_none());
    }

    #[test]
    #[serial]
    fn reads_overrides_and_trims_trailing_slash() {
        let _guard = EnvGuard::clean();
        env::set_var("STUDYGUARD_SERVER_URL", "http://study.local:8000/");
        env::set_var("STUDYGUARD_WORK_SECS", "60");
        env::set_var("STUDYGUARD_BREAK_SECS", "10");
        env::set_var("STUDYGUARD_QUOTE_POLL_MS", "250");
        env::set_var("STUDYGUARD_LOG_FILE", "/tmp/studyguard.log");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_url, "http://study.local:8000");
        assert_eq!(config.durations.work_secs, 60);
        assert_eq!(config.durations.break_secs, 10);
        assert_eq!(config.quote_poll, Duration::from_millis(250));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/studyguard.log")));
    }

    #[test]
    #[serial]
    fn rejects_zero_and_garbage() {
        let _guard = EnvGuard::clean();
        env::set_var("STUDYGUARD_WORK_SECS", "0");
        let err = Config::from_env().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for STUDYGUARD_WORK_SECS: value must be greater than 0"
        );

        env::set_var("STUDYGUARD_WORK_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("expected positive integer"));
    }

    #[test]
    fn with_server_url_normalizes() {
        let config = Config::default().with_server_url(" http://example.com/// ");
        assert_eq!(config.server_url, "http://example.com");
    }
}
