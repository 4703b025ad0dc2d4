//! Error types for sessionlog.

use thiserror::Error;

/// Errors that can occur while logging sessions.
///
/// Parsing anomalies are never errors; only configuration, identifier
/// resolution and I/O against the collaborators end a run.
#[derive(Error, Debug)]
pub enum SessionLogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Sheet write error: {0}")]
    Sink(String),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sessionlog operations.
pub type SessionLogResult<T> = Result<T, SessionLogError>;
