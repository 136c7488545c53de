//! Server configuration module.
//!
//! Parses configuration from environment variables for the StudyGuard server.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `PORT` | No | 5000 | HTTP server port |
//! | `STUDYGUARD_TIREDNESS_THRESHOLD` | No | 5 | Tiredness reports needed before a new quote |

use std::env;

use thiserror::Error;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default number of tiredness reports that must be exceeded before a new
/// quote is chosen.
pub const DEFAULT_TIREDNESS_THRESHOLD: u32 = 5;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable has invalid format.
    #[error("invalid format for {var}: {message}")]
    InvalidFormat { var: String, message: String },

    /// Port number is invalid.
    #[error("invalid port number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,

    /// Tiredness reports that must be exceeded before a new quote.
    pub tiredness_threshold: u32,
}

impl Config {
    /// Parse configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PORT` is not a valid u16 or the tiredness
    /// threshold is not a positive integer.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use studyguard_server::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load config");
    /// println!("Server will listen on port {}", config.port);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_port()?,
            tiredness_threshold: parse_threshold()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tiredness_threshold: DEFAULT_TIREDNESS_THRESHOLD,
        }
    }
}

/// Parse the PORT environment variable.
///
/// Returns the default port if not set.
fn parse_port() -> Result<u16, ConfigError> {
    match env::var("PORT") {
        Ok(port_str) => Ok(port_str.trim().parse()?),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_PORT),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidFormat {
            var: "PORT".to_string(),
            message: "contains invalid unicode".to_string(),
        }),
    }
}

fn parse_threshold() -> Result<u32, ConfigError> {
    const VAR: &str = "STUDYGUARD_TIREDNESS_THRESHOLD";

    let value = match env::var(VAR) {
        Ok(value) => value,
        Err(_) => return Ok(DEFAULT_TIREDNESS_THRESHOLD),
    };

    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidFormat {
            var: VAR.to_string(),
            message: format!("expected positive integer, got '{value}'"),
        }),
    }
}
