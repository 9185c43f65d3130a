use crate::error::TypeError;
use crate::feature::LABEL_COLUMN;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::Display;

pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Minimum non-null observations per side for a feature to be tested
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Check that a p-value cutoff is a probability.
///
/// 0 and 1 are accepted: 0 flags nothing, 1 flags everything short of identity.
pub fn validate_threshold(threshold: f64) -> Result<f64, TypeError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(TypeError::InvalidThreshold(threshold))
    }
}

/// Knobs for a drift evaluation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriftConfig {
    /// Reference column excluded from comparison
    pub label_column: String,

    /// Upper bound on the synthesized production sample
    pub fallback_max_rows: usize,

    /// Feature perturbed in the synthesized production sample
    pub fallback_noise_feature: String,

    /// Standard deviation of the zero-mean noise added to the perturbed feature
    pub fallback_noise_std: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            label_column: LABEL_COLUMN.to_string(),
            fallback_max_rows: 100,
            fallback_noise_feature: "Age".to_string(),
            fallback_noise_std: 5.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureDrift {
    /// Kolmogorov-Smirnov statistic (max gap between the two empirical CDFs)
    pub statistic: f64,
    pub p_value: f64,
    pub drift_detected: bool,
    pub reference_count: usize,
    pub production_count: usize,
}

impl FeatureDrift {
    pub fn new(
        statistic: f64,
        p_value: f64,
        threshold: f64,
        reference_count: usize,
        production_count: usize,
    ) -> Self {
        Self {
            statistic,
            p_value,
            drift_detected: p_value < threshold,
            reference_count,
            production_count,
        }
    }
}

/// Why a reference feature has no entry in [`DriftResult::features`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingInProduction,
    NonNumeric,
    InsufficientSample {
        reference_count: usize,
        production_count: usize,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    Stable,
    DriftDetected,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DriftResult {
    pub features: BTreeMap<String, FeatureDrift>,
    pub skipped: BTreeMap<String, SkipReason>,
}

impl DriftResult {
    pub fn features_analyzed(&self) -> usize {
        self.features.len()
    }

    pub fn features_drifted(&self) -> usize {
        self.features.values().filter(|f| f.drift_detected).count()
    }

    pub fn drifted_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, f)| f.drift_detected)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// True when no feature had enough data on both sides to be tested
    pub fn is_inconclusive(&self) -> bool {
        self.features.is_empty()
    }

    pub fn status(&self) -> HealthStatus {
        if self.features_drifted() == 0 {
            HealthStatus::Stable
        } else {
            HealthStatus::DriftDetected
        }
    }

    /// Re-apply a cutoff to the already computed p-values
    pub fn with_threshold(&self, threshold: f64) -> Self {
        let features = self
            .features
            .iter()
            .map(|(name, f)| {
                (
                    name.clone(),
                    FeatureDrift::new(
                        f.statistic,
                        f.p_value,
                        threshold,
                        f.reference_count,
                        f.production_count,
                    ),
                )
            })
            .collect();

        Self {
            features,
            skipped: self.skipped.clone(),
        }
    }
}

/// A drift evaluation as returned to callers.
///
/// `synthesized` is true when no production log existed and the comparison
/// ran against a noisy resample of the reference. Such a report exercises the
/// pipeline but says nothing about real traffic. `inconclusive` is true when
/// every feature was skipped, so a `stable` status carries no evidence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriftReport {
    pub features: BTreeMap<String, FeatureDrift>,
    pub skipped: BTreeMap<String, SkipReason>,
    pub threshold: f64,
    pub synthesized: bool,
    pub reference_rows: usize,
    pub production_rows: usize,
    pub features_analyzed: usize,
    pub features_drifted: usize,
    pub status: HealthStatus,
    pub inconclusive: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl DriftReport {
    pub fn new(
        result: DriftResult,
        threshold: f64,
        synthesized: bool,
        reference_rows: usize,
        production_rows: usize,
    ) -> Self {
        let features_analyzed = result.features_analyzed();
        let features_drifted = result.features_drifted();
        let status = result.status();
        let inconclusive = result.is_inconclusive();

        Self {
            features: result.features,
            skipped: result.skipped,
            threshold,
            synthesized,
            reference_rows,
            production_rows,
            features_analyzed,
            features_drifted,
            status,
            inconclusive,
            evaluated_at: Utc::now(),
        }
    }

    pub fn result(&self) -> DriftResult {
        DriftResult {
            features: self.features.clone(),
            skipped: self.skipped.clone(),
        }
    }

    pub fn model_dump_json(&self) -> Result<String, TypeError> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::SerializeError(e.to_string()))
    }
}
