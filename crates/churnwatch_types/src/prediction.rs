use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

const HIGH_RISK_CUTOFF: f64 = 0.7;
const MEDIUM_RISK_CUTOFF: f64 = 0.3;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a churn probability. Both cutoffs are exclusive.
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_CUTOFF {
            RiskLevel::High
        } else if probability > MEDIUM_RISK_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResponse {
    pub churn_probability: f64,
    pub risk_level: RiskLevel,

    /// False when the input could not be appended to the production log
    pub recorded: bool,
}

impl PredictionResponse {
    pub fn new(churn_probability: f64, recorded: bool) -> Self {
        Self {
            churn_probability,
            risk_level: RiskLevel::from_probability(churn_probability),
            recorded,
        }
    }
}
