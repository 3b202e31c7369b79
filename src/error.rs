//! Error types for CSV loading and cleaning

use std::path::PathBuf;

/// Result type for table and cleaning operations
pub type Result<T> = std::result::Result<T, CleanError>;

/// Errors raised while loading, transforming or writing a table
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    #[error("Failed to read CSV from path '{input}' or as string content: {cause}")]
    Load { input: String, cause: String },

    #[error("CSV input too large: {size} bytes > {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("Malformed CSV: {0}")]
    Malformed(String),

    #[error("Column '{column}' not found in CSV. Available columns: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Columns not found: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("fill_value required when strategy is 'constant'")]
    MissingFillValue,

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error(
        "Unknown operator '{0}'. Valid operators: equals, not_equals, greater, less, contains, not_contains"
    )]
    UnknownOperator(String),

    #[error("keep must be either 'first', 'last' or 'none', got '{0}'")]
    InvalidKeep(String),

    #[error("could not convert string to float: '{0}'")]
    NotNumeric(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Writing output is disabled (server started with --read-only)")]
    WritesDisabled,

    #[error("Invalid output path {path}: {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    #[error("Integer overflow computing {0}")]
    Overflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
