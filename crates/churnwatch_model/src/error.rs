use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to load model from {path}: {reason}")]
    LoadError { path: PathBuf, reason: String },

    #[error("Model features {found:?} do not match the expected schema {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Expected {expected} {what}, got {actual}")]
    CoefficientLengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Scaler has a zero or non-finite scale for feature {0}")]
    InvalidScale(String),

    #[error("Model produced a non-finite probability")]
    NonFiniteProbability,

    #[error(transparent)]
    TypeError(#[from] churnwatch_types::TypeError),
}
