//! Error types for spectacles

use thiserror::Error;

/// Errors raised by the data-access and view layers
///
/// The timeline components are infallible; everything here comes from the
/// outer layer that feeds them.
#[derive(Debug, Error)]
pub enum Error {
    /// SQLite query or connection failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure (creating the database directory, reading config)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// Input that could not be parsed (branch tag, timestamp, lookup key)
    #[error("parse error: {0}")]
    Parse(String),

    /// A write that contradicts an already recorded build
    #[error("conflicting build: {0}")]
    Conflict(String),

    /// A blocking database task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
