use crate::util::env_string_or;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ModelSettings {
    pub model_path: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(env_string_or(
                "CHURNWATCH_MODEL_PATH",
                "model/churn_model.json",
            )),
        }
    }
}
