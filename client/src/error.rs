//! Error types for the StudyGuard client.
//!
//! Each module owns its own error enum ([`ApiError`], [`ConfigError`],
//! [`InputError`]); [`ClientError`] gathers the ones a single operation can
//! hit together, such as task creation validating input before calling the
//! service.
//!
//! [`ConfigError`]: crate::config::ConfigError

use thiserror::Error;

use crate::api::ApiError;
use crate::tasks::InputError;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Study service error.
    #[error("service error: {0}")]
    Api(#[from] ApiError),

    /// Invalid user input.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(String),
}

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_conversion() {
        let err: ClientError = InputError::EmptyTaskName.into();
        assert!(matches!(err, ClientError::Input(InputError::EmptyTaskName)));
        assert_eq!(err.to_string(), "invalid input: task name cannot be empty");
    }

    #[test]
    fn api_error_conversion() {
        let err: ClientError = ApiError::Failed {
            operation: "create task",
        }
        .into();
        assert!(matches!(err, ClientError::Api(_)));
        assert_eq!(
            err.to_string(),
            "service error: create task failed on the server"
        );
    }

    #[test]
    fn tui_error_display() {
        let err = TuiError::TerminalInit(std::io::Error::other("no tty"));
        assert_eq!(err.to_string(), "failed to initialize terminal: no tty");

        let err = TuiError::Event("input thread ended".to_string());
        assert_eq!(err.to_string(), "event error: input thread ended");
    }
}
