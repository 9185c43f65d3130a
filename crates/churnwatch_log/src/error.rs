use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to write production log {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error("Production log {path} has header {found:?}, expected {expected:?}")]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Production log lock poisoned")]
    LockPoisoned,

    #[error("Failed to encode row: {0}")]
    EncodeError(String),
}

impl LogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::IoFailure {
            path: path.into(),
            source,
        }
    }
}
