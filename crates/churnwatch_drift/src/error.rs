use churnwatch_types::TypeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error("Column {column} has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Failed to build noise distribution: {0}")]
    NoiseDistributionError(String),
}

impl DriftError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DriftError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
