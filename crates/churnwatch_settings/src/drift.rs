use crate::util::{env_or, env_string_or};
use churnwatch_types::{validate_threshold, DriftConfig, DEFAULT_THRESHOLD, LABEL_COLUMN};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct DriftSettings {
    /// Cutoff used when a drift check does not pass one
    pub default_threshold: f64,
    pub config: DriftConfig,
}

impl Default for DriftSettings {
    fn default() -> Self {
        let threshold = env_or("CHURNWATCH_DRIFT_THRESHOLD", DEFAULT_THRESHOLD);
        let default_threshold = validate_threshold(threshold).unwrap_or_else(|e| {
            warn!("{}. Using default {}", e, DEFAULT_THRESHOLD);
            DEFAULT_THRESHOLD
        });

        let config = DriftConfig {
            label_column: env_string_or("CHURNWATCH_LABEL_COLUMN", LABEL_COLUMN),
            ..DriftConfig::default()
        };

        Self {
            default_threshold,
            config,
        }
    }
}
