use serde::Serialize;

pub mod data;
pub mod drift;
pub mod logging;
pub mod model;
mod util;

pub use data::DataSettings;
pub use drift::DriftSettings;
pub use logging::LogSettings;
pub use model::ModelSettings;

use util::env_or;

#[derive(Debug, Clone, Serialize)]
pub struct ChurnwatchServerConfig {
    pub server_port: u16,
    pub metrics_port: u16,
    pub request_timeout_secs: u64,
    pub data_settings: DataSettings,
    pub model_settings: ModelSettings,
    pub drift_settings: DriftSettings,
    pub log_settings: LogSettings,
}

impl Default for ChurnwatchServerConfig {
    fn default() -> Self {
        Self {
            server_port: env_or("CHURNWATCH_SERVER_PORT", 8000),
            metrics_port: env_or("CHURNWATCH_METRICS_PORT", 8001),
            request_timeout_secs: env_or("CHURNWATCH_REQUEST_TIMEOUT_SECS", 30),
            data_settings: DataSettings::default(),
            model_settings: ModelSettings::default(),
            drift_settings: DriftSettings::default(),
            log_settings: LogSettings::default(),
        }
    }
}

impl ChurnwatchServerConfig {
    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.server_port)
    }

    pub fn metrics_addr(&self) -> String {
        format!("0.0.0.0:{}", self.metrics_port)
    }
}
