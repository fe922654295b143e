//! GTFS loading errors.

use std::path::PathBuf;

/// Error loading a GTFS feed from disk.
#[derive(Debug, thiserror::Error)]
pub enum GtfsError {
    /// The data directory does not exist
    #[error("data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// A required table file is missing
    #[error("required GTFS file not found: {0}")]
    MissingFile(PathBuf),

    /// A table failed to parse as CSV
    #[error("failed to read {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A row parsed as CSV but contained an invalid value
    #[error("{file} row {row}: {message}")]
    BadRow {
        file: String,
        row: u64,
        message: String,
    },
}
