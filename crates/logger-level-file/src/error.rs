//! Error types for the level file sink

use crate::Level;

use std::io;
use std::path::PathBuf;

/// Result type for level file sink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while routing or writing a log entry
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sink has no file configured for the entry's level
    #[error("no file provided for log level: {0}")]
    UnroutedLevel(Level),

    /// The entry could not be rendered to text
    #[error("failed to render log entry: {0}")]
    Render(#[source] FormatError),

    /// The destination file could not be opened or created
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// The destination that failed to open
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The destination was opened but the payload was not fully written
    #[error("failed to write log file {path}: {source}")]
    Write {
        /// The destination that failed to accept the write
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// A level name could not be parsed
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Sink configuration could not be parsed
    #[error("invalid sink configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// IO operation failed.
    #[error("{0}: {1}")]
    Io(&'static str, #[source] io::Error),
}

/// Errors produced by a [`Formatter`](crate::Formatter)
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// JSON serialization failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Writing into the render buffer failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Formatter specific failure
    #[error("{0}")]
    Custom(String),
}
