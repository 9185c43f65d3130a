use crate::error::ModelError;
use crate::ChurnClassifier;
use churnwatch_types::{FeatureRow, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Per-feature standardization applied before the linear term
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Logistic regression exported as JSON.
///
/// ```json
/// {
///   "feature_names": ["CreditScore", "Age", ...],
///   "coefficients": [...],
///   "intercept": -1.2,
///   "scaler": { "mean": [...], "scale": [...] }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,

    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn check_len(what: &'static str, actual: usize) -> Result<(), ModelError> {
    if actual != FEATURE_NAMES.len() {
        return Err(ModelError::CoefficientLengthMismatch {
            what,
            expected: FEATURE_NAMES.len(),
            actual,
        });
    }
    Ok(())
}

impl LogisticModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let load_error = |reason: String| ModelError::LoadError {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let model: LogisticModel =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

        model.validate()?;
        info!("Loaded churn model from {}", path.display());

        Ok(model)
    }

    /// The artifact must have been trained on the fixed schema, in order
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names != FEATURE_NAMES {
            return Err(ModelError::SchemaMismatch {
                expected: FEATURE_NAMES.map(String::from).to_vec(),
                found: self.feature_names.clone(),
            });
        }

        check_len("coefficients", self.coefficients.len())?;

        if let Some(scaler) = &self.scaler {
            check_len("scaler means", scaler.mean.len())?;
            check_len("scaler scales", scaler.scale.len())?;

            if let Some(i) = scaler.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
                return Err(ModelError::InvalidScale(FEATURE_NAMES[i].to_string()));
            }
        }

        Ok(())
    }

    fn decision_function(&self, row: &FeatureRow) -> f64 {
        let values = row.values();

        let linear = match &self.scaler {
            Some(scaler) => values
                .iter()
                .zip(&scaler.mean)
                .zip(&scaler.scale)
                .zip(&self.coefficients)
                .map(|(((x, mean), scale), coef)| (x - mean) / scale * coef)
                .sum::<f64>(),
            None => values
                .iter()
                .zip(&self.coefficients)
                .map(|(x, coef)| x * coef)
                .sum::<f64>(),
        };

        linear + self.intercept
    }
}

impl ChurnClassifier for LogisticModel {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        row.validate()?;

        let probability = sigmoid(self.decision_function(row));
        if !probability.is_finite() {
            return Err(ModelError::NonFiniteProbability);
        }

        Ok(probability)
    }
}
