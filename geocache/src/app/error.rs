//! Application error types.

use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during application startup.
#[derive(Debug)]
pub enum AppError {
    /// Configuration failed validation.
    Config(ConfigError),

    /// No Tokio runtime to run the cleanup daemon on.
    RuntimeUnavailable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => {
                write!(f, "Configuration error: {}", e)
            }
            AppError::RuntimeUnavailable(msg) => {
                write!(f, "No Tokio runtime available: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::RuntimeUnavailable(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}
