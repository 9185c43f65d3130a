use anyhow::{Context, Result};
use churnwatch_model::{ChurnClassifier, LogisticModel};
use churnwatch_settings::{LogSettings, ModelSettings};
use std::io;
use std::sync::Arc;
use time::format_description;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIME_PATTERN: &str =
    "[year]-[month]-[day]T[hour repr:24]:[minute]:[second]::[subsecond digits:4]";

/// Install the global subscriber. Fails if one is already set.
///
/// An unparsable `log_level` falls back to `info` instead of failing.
pub fn setup_logging(settings: &LogSettings) -> Result<()> {
    let time_format = format_description::parse(DEFAULT_TIME_PATTERN)
        .context("Failed to parse log time format")?;
    let timer = UtcTime::new(time_format);

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log level {:?} ({}), falling back to {}",
            settings.log_level, e, DEFAULT_LOG_LEVEL
        );
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    let result = if settings.log_json {
        tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_target(false)
            .with_thread_ids(true)
            .with_timer(timer)
            .with_env_filter(filter)
            .with_writer(io::stdout)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_ansi(true)
            .with_target(false)
            .with_thread_ids(true)
            .with_timer(timer)
            .with_env_filter(filter)
            .with_writer(io::stdout)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

pub fn load_model(settings: &ModelSettings) -> Result<Arc<dyn ChurnClassifier>> {
    let model = LogisticModel::load(&settings.model_path).with_context(|| {
        format!(
            "Failed to load churn model from {}",
            settings.model_path.display()
        )
    })?;

    info!("Churn model ready");
    Ok(Arc::new(model))
}
