use crate::dataset::{Column, Dataset};
use crate::error::DriftError;
use crate::fallback::synthesize_production;
use crate::ks::ks_2samp;
use churnwatch_types::{
    validate_threshold, DriftConfig, DriftReport, DriftResult, FeatureDrift, SkipReason,
    MIN_SAMPLE_SIZE,
};
use itertools::Itertools;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Compares a reference dataset against the production log, one feature at a time
#[derive(Debug, Clone, Default)]
pub struct DriftEvaluator {
    config: DriftConfig,
}

/// A log that was never written, or whose first write was rolled back,
/// holds no production data yet.
fn has_production_data(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

impl DriftEvaluator {
    pub fn new(config: DriftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Run a drift check over the two files.
    ///
    /// # Arguments
    ///
    /// * `reference_path` - Reference table, must exist and parse
    /// * `production_path` - Production log, may be absent
    /// * `threshold` - p-value cutoff in [0, 1]
    ///
    /// # Returns
    ///
    /// A [`DriftReport`]. When the production log is absent the report is
    /// built from a synthesized sample and `synthesized` is set.
    pub fn evaluate(
        &self,
        reference_path: &Path,
        production_path: &Path,
        threshold: f64,
    ) -> Result<DriftReport, DriftError> {
        let mut rng = StdRng::from_entropy();
        self.evaluate_with_rng(reference_path, production_path, threshold, &mut rng)
    }

    /// Same as [`DriftEvaluator::evaluate`] with a caller supplied generator
    /// for the synthesized sample
    #[instrument(skip_all, fields(threshold = threshold))]
    pub fn evaluate_with_rng<R>(
        &self,
        reference_path: &Path,
        production_path: &Path,
        threshold: f64,
        rng: &mut R,
    ) -> Result<DriftReport, DriftError>
    where
        R: Rng + ?Sized,
    {
        let threshold = validate_threshold(threshold)?;
        let reference = Dataset::from_csv(reference_path)?;

        let synthesized = !has_production_data(production_path);
        let production = if synthesized {
            warn!(
                "No production data at {}, comparing against a synthesized sample",
                production_path.display()
            );
            synthesize_production(&reference, &self.config, rng)?
        } else {
            Dataset::from_csv(production_path)?
        };

        let result = self.compare(&reference, &production, threshold);

        info!(
            features_analyzed = result.features_analyzed(),
            features_drifted = result.features_drifted(),
            skipped = result.skipped.len(),
            synthesized,
            "Drift evaluation complete"
        );

        if result.is_inconclusive() {
            warn!("No feature had enough values on both sides to be tested");
        }

        Ok(DriftReport::new(
            result,
            threshold,
            synthesized,
            reference.n_rows(),
            production.n_rows(),
        ))
    }

    /// Reference columns other than the label, in file order
    pub fn candidate_features<'a>(&self, reference: &'a Dataset) -> Vec<&'a str> {
        reference
            .column_names()
            .iter()
            .map(String::as_str)
            .filter(|name| *name != self.config.label_column)
            .collect()
    }

    fn compare_feature(
        &self,
        feature: &str,
        reference: &Dataset,
        production: &Dataset,
        threshold: f64,
    ) -> Result<FeatureDrift, SkipReason> {
        let production_column = production
            .column(feature)
            .ok_or(SkipReason::MissingInProduction)?;

        let (reference_values, production_values) =
            match (reference.column(feature), production_column) {
                (Some(Column::Numeric(_)), Column::Numeric(_)) => (
                    reference.non_null(feature).unwrap_or_default(),
                    production.non_null(feature).unwrap_or_default(),
                ),
                _ => return Err(SkipReason::NonNumeric),
            };

        let reference_count = reference_values.len();
        let production_count = production_values.len();

        if reference_count < MIN_SAMPLE_SIZE || production_count < MIN_SAMPLE_SIZE {
            return Err(SkipReason::InsufficientSample {
                reference_count,
                production_count,
            });
        }

        let ks = ks_2samp(&reference_values, &production_values).ok_or(
            SkipReason::InsufficientSample {
                reference_count,
                production_count,
            },
        )?;

        Ok(FeatureDrift::new(
            ks.statistic,
            ks.p_value,
            threshold,
            reference_count,
            production_count,
        ))
    }

    /// Pure comparison of two loaded datasets.
    ///
    /// Features missing from production, non-numeric on either side, or with
    /// fewer than two non-null values on a side are listed in `skipped`
    /// instead of failing the evaluation.
    pub fn compare(&self, reference: &Dataset, production: &Dataset, threshold: f64) -> DriftResult {
        let outcomes = self
            .candidate_features(reference)
            .into_par_iter()
            .map(|feature| {
                (
                    feature.to_string(),
                    self.compare_feature(feature, reference, production, threshold),
                )
            })
            .collect::<Vec<_>>();

        let mut features = BTreeMap::new();
        let mut skipped = BTreeMap::new();

        for (feature, outcome) in outcomes {
            match outcome {
                Ok(drift) => {
                    features.insert(feature, drift);
                }
                Err(reason) => {
                    skipped.insert(feature, reason);
                }
            }
        }

        let missing = skipped
            .iter()
            .filter(|(_, reason)| **reason == SkipReason::MissingInProduction)
            .map(|(name, _)| name.as_str())
            .join(", ");

        if !missing.is_empty() {
            warn!("Reference features missing from production data: {}", missing);
        }

        DriftResult { features, skipped }
    }
}
