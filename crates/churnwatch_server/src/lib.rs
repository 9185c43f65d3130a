pub mod api;

use crate::api::middleware::metrics::metrics_app;
use crate::api::setup::{load_model, setup_logging};
use crate::api::shutdown::shutdown_signal;
use crate::api::state::AppState;
use anyhow::Context;
use api::router::create_router;
use axum::Router;
use churnwatch_drift::DriftEvaluator;
use churnwatch_log::ProductionLog;
use churnwatch_model::ChurnClassifier;
use churnwatch_settings::ChurnwatchServerConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Create the main server
///
/// Loads the model artifact named by the configuration and opens the
/// production log.
///
/// # Arguments
///
/// * `config` - The server configuration
///
/// # Returns
///
/// The main server router and its shared state
pub async fn create_app(
    config: ChurnwatchServerConfig,
) -> Result<(Router, Arc<AppState>), anyhow::Error> {
    // setup logging, soft fail if it fails
    if let Err(e) = setup_logging(&config.log_settings) {
        warn!("Keeping existing log subscriber: {:?}", e);
    }

    let model = load_model(&config.model_settings)?;
    create_app_with_model(config, model).await
}

/// Same as [`create_app`] with an already loaded classifier
pub async fn create_app_with_model(
    config: ChurnwatchServerConfig,
    model: Arc<dyn ChurnClassifier>,
) -> Result<(Router, Arc<AppState>), anyhow::Error> {
    let production_log = ProductionLog::open(&config.data_settings.production_path)
        .with_context(|| "Failed to open production log")?;
    let evaluator = DriftEvaluator::new(config.drift_settings.config.clone());

    let app_state = Arc::new(AppState {
        config: Arc::new(config),
        model,
        production_log: Arc::new(production_log),
        evaluator: Arc::new(evaluator),
    });

    let router = create_router(app_state.clone())
        .await
        .with_context(|| "Failed to create router")?;

    Ok((router, app_state))
}

/// Start the main server
pub async fn start_main_server(config: ChurnwatchServerConfig) -> Result<(), anyhow::Error> {
    let addr = config.server_addr();
    let (router, _app_state) = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Churnwatch server started successfully on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Failed to start main server")?;

    Ok(())
}

/// Start the metrics server for prometheus
pub async fn start_metrics_server(addr: String) -> Result<(), anyhow::Error> {
    let app = metrics_app().with_context(|| "Failed to setup metrics app")?;

    // NOTE: metrics are exposed on their own port
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr} for metrics server"))?;
    axum::serve(listener, app)
        .await
        .with_context(|| "Failed to start metrics server")?;

    Ok(())
}
