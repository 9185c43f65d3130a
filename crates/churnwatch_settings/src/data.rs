use crate::util::env_string_or;
use serde::Serialize;
use std::path::PathBuf;

/// Locations of the reference dataset and the production log
#[derive(Debug, Clone, Serialize)]
pub struct DataSettings {
    pub reference_path: PathBuf,
    pub production_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        let reference_path = env_string_or("CHURNWATCH_REFERENCE_PATH", "data/bank_churn.csv");
        let production_path =
            env_string_or("CHURNWATCH_PRODUCTION_PATH", "data/production_data.csv");

        Self {
            reference_path: PathBuf::from(reference_path),
            production_path: PathBuf::from(production_path),
        }
    }
}
