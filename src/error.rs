//! Error types raised while loading and cleaning the order dataset.

use thiserror::Error;

/// Errors that abort a cleaning pass.
///
/// Rows carrying the sentinel marker are dropped silently; everything listed
/// here is a malformed value that leaves the dataset without a defined
/// cleaned form.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: invalid integer in column {column}: {value:?}")]
    InvalidInteger {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: invalid number in column {column}: {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: negative value in column {column}: {value}")]
    Negative {
        row: usize,
        column: &'static str,
        value: i64,
    },

    #[error("Row {row}: invalid time taken: {value:?}")]
    InvalidTimeTaken { row: usize, value: String },

    #[error("Row {row}: invalid order date {value:?} for format {format:?}")]
    InvalidDate {
        row: usize,
        value: String,
        format: String,
    },

    #[error("Row {row}: unknown {column} category: {value:?}")]
    UnknownCategory {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, CleanError>;
