use churnwatch_server::{start_main_server, start_metrics_server};
use churnwatch_settings::ChurnwatchServerConfig;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ChurnwatchServerConfig::default();

    let metrics_addr = config.metrics_addr();
    tokio::spawn(async move {
        if let Err(e) = start_metrics_server(metrics_addr).await {
            error!("Metrics server error: {:?}", e);
        }
    });

    start_main_server(config).await
}
