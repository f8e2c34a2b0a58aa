//! Error types for SQLite storage operations.
//!
//! Provides a unified error type covering database access, record
//! validation, schema conflicts, and store-open failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during SQLite storage operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Record construction or definition validation failure.
    #[error("validation error: {0}")]
    ValidationError(#[from] entity_schema_core::ValidationError),

    /// Record loading failure.
    #[error("records error: {0}")]
    RecordsError(#[from] entity_schema_records::RecordsError),

    /// The store could not be opened or created at the given path.
    #[error("cannot open database at '{}': {source}", path.display())]
    OpenError {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying SQLite failure.
        source: rusqlite::Error,
    },

    /// The declared definition conflicts with the existing physical table.
    #[error("schema mismatch for table '{table}': {detail}")]
    SchemaMismatch {
        /// Physical table name.
        table: String,
        /// Human-readable description of the conflict.
        detail: String,
    },

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// Full-text search was requested on a table that does not declare it.
    #[error("table '{0}' has no full-text-search shadow table")]
    NoFullTextSearch(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
