use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ConsolidateError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, consolidates, or exports timesheet data.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when an acronym or subject pattern fails to compile.
    #[error("invalid text pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the destination is open or locked by another process.
    #[error("destination file is locked by another process: {0}")]
    DestinationLocked(PathBuf),

    /// Errors bubbled up from the CSV writer implementation.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
