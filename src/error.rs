//! Error types for loading, normalizing and reporting on the time series.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or reading a dashboard.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or read the source file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited source could not be parsed.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the caller asked for is not in the table.
    #[error("column '{column}' not found in dataset")]
    MissingColumn { column: String },

    /// A record with a different number of cells than the header.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Date text that is not `YYYY-MM-DD`.
    #[error("cannot parse '{value}' in column '{column}' (row {row}) as a YYYY-MM-DD date")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// A value that is neither the missing sentinel nor the expected numeric kind.
    #[error("cannot coerce '{value}' in column '{column}' (row {row}) to {expected}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// The requested day did not resolve to exactly one record.
    #[error("expected exactly one record for {date}, found {matches}")]
    Selection { date: String, matches: usize },

    /// A field that must always be present is missing.
    #[error("'{column}' is not available for {date}")]
    DataUnavailable { column: String, date: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;
