use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DriftCheckParams {
    /// Falls back to the configured default when absent
    pub threshold: Option<f64>,
}
