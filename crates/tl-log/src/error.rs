//! Log parsing errors.

use std::path::PathBuf;

use thiserror::Error;
use tl_catalog::CatalogError;

/// Result type for log parsing and run queries.
pub type LogResult<T> = Result<T, LogError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogError {
    /// A thermo block's YAML payload is inconsistent or unparsable.
    #[error("Malformed thermo table for run {run} (line {line}, byte {offset}): {details}")]
    MalformedTable {
        run: usize,
        line: usize,
        offset: usize,
        details: String,
    },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Run not found: {index} (document has {count} runs)")]
    RunNotFound { index: usize, count: usize },

    #[error("Failed to read log file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Units catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl LogError {
    pub(crate) fn malformed(
        run: usize,
        line: usize,
        offset: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::MalformedTable {
            run,
            line,
            offset,
            details: details.into(),
        }
    }
}
