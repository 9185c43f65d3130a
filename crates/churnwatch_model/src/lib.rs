pub mod error;
pub mod logistic;

pub use error::ModelError;
pub use logistic::{LogisticModel, StandardScaler};

use churnwatch_types::FeatureRow;
use std::fmt::Debug;

/// A pre-trained churn classifier scoring one row at a time
pub trait ChurnClassifier: Send + Sync + Debug {
    /// Probability that the customer leaves, in [0, 1]
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError>;
}
