//! Custom error types for xg.
//!
//! Two tiers, matching how failures surface to the dashboard: validation
//! errors are the caller's fault and carry a human-readable message; backend
//! errors are logged with context and absorbed into safe defaults on read
//! paths, or returned as failure outcomes on write paths.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for xg operations.
#[derive(Error, Debug)]
pub enum XgError {
    /// Missing or malformed caller input. Always surfaced synchronously.
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    /// The backing store was unreachable or an operation failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored tweet payload could not be parsed. Batch reads skip the
    /// offending entry and keep going.
    #[error("Failed to parse stored tweet '{id}': {reason}")]
    TweetParse { id: String, reason: String },

    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    Config { path: PathBuf, reason: String },

    /// Ingest input file error.
    #[error("Failed to read ingest file '{path}': {source}")]
    IngestFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File read/write error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped anyhow error for gradual migration.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for xg operations.
pub type Result<T> = std::result::Result<T, XgError>;

impl XgError {
    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a tweet payload parse error.
    pub fn tweet_parse(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TweetParse {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the user can fix this error themselves (as opposed to the
    /// backend being down or data being corrupt).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::IngestFile { .. })
    }
}
