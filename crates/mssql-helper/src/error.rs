//! Helper error types.

use thiserror::Error;

/// Errors that can occur during helper operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or connection string error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Connection timeout occurred.
    #[error("connection timed out")]
    ConnectionTimeout,

    /// Invalid command arguments.
    #[error("invalid command: {0}")]
    Command(String),

    /// Command execution timeout occurred.
    #[error("command timed out")]
    CommandTimeout,

    /// Error reported by the underlying client, propagated as-is.
    #[error("client error: {0}")]
    Client(#[from] tiberius::error::Error),

    /// Query produced an unusable result.
    #[error("query error: {0}")]
    Query(String),

    /// A single-row helper found no rows.
    #[error("query returned no rows")]
    NoRows,

    /// A single-row helper found more than one row.
    #[error("query returned more than one row")]
    MoreThanOneRow,

    /// A single-column helper found more than one column.
    #[error("query returned more than one column")]
    MoreThanOneColumn,

    /// A batch script split to zero executable statements.
    #[error("batch contains no executable statements")]
    EmptyBatch,

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for helper operations.
pub type Result<T> = std::result::Result<T, Error>;
