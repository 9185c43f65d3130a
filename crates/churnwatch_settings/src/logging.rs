use crate::util::{env_or, env_string_or};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LogSettings {
    /// Filter directive handed to the subscriber, e.g. `info` or `churnwatch_drift=debug`
    pub log_level: String,
    pub log_json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_level: env_string_or("LOG_LEVEL", "info"),
            log_json: env_or("LOG_JSON", true),
        }
    }
}
