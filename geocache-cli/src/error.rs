//! CLI error types.

use std::path::PathBuf;

use geocache::app::AppError;
use geocache::bounds::BoundsError;
use geocache::config::ConfigError;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid bounds: {0}")]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start cache: {0}")]
    App(#[from] AppError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request on trace line {line}: {source}")]
    Trace {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
