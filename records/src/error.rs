//! Error types for record loading.
//!
//! Provides a unified error type covering I/O, JSON and YAML parsing, and
//! malformed record content.

use thiserror::Error;

/// Errors that can occur while loading raw records.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A record source held something other than objects.
    #[error("invalid record in {path}: {detail}")]
    InvalidRecord {
        /// Source file the record came from.
        path: String,
        /// What was wrong with it.
        detail: String,
    },

    /// All configured loader sources failed.
    #[error("no record sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`RecordsError`].
pub type Result<T> = std::result::Result<T, RecordsError>;
