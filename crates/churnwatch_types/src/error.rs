use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TypeError {
    #[error("Feature {feature} must be a finite number, got {value}")]
    InvalidFeatureValue { feature: String, value: f64 },

    #[error("Indicator feature {feature} must be 0 or 1, got {value}")]
    InvalidIndicator { feature: String, value: f64 },

    #[error("At most one geography indicator may be set")]
    ConflictingGeography,

    #[error("Drift threshold must be a probability in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Expected {expected} feature values, got {actual}")]
    FeatureCountError { expected: usize, actual: usize },

    #[error("Failed to serialize: {0}")]
    SerializeError(String),
}
