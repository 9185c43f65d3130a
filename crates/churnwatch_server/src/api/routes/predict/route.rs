use crate::api::error::ServerError;
use crate::api::state::AppState;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::{routing::post, Json, Router};
use churnwatch_types::{FeatureRow, PredictionResponse};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Score one customer, then append the row to the production log.
///
/// A failed append does not fail the request; it surfaces as `recorded: false`.
#[instrument(skip_all)]
pub async fn predict_churn(
    State(state): State<Arc<AppState>>,
    Json(row): Json<FeatureRow>,
) -> Result<Json<PredictionResponse>, ServerError> {
    // the classifier validates the row
    let probability = state.model.predict_proba(&row)?;

    let production_log = state.production_log.clone();
    let recorded = match tokio::task::spawn_blocking(move || production_log.record(&row)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!("Failed to record production row: {}", e);
            false
        }
        Err(e) => {
            error!("Production log task failed: {}", e);
            false
        }
    };

    if !recorded {
        metrics::counter!("churnwatch_record_failures_total").increment(1);
    }

    let response = PredictionResponse::new(probability, recorded);
    debug!(
        "Churn probability {:.4} ({})",
        response.churn_probability, response.risk_level
    );

    metrics::counter!(
        "churnwatch_predictions_total",
        "risk_level" => response.risk_level.to_string()
    )
    .increment(1);

    Ok(Json(response))
}

pub async fn get_predict_router(prefix: &str) -> Result<Router<Arc<AppState>>> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        Router::new().route(&format!("{}/predict", prefix), post(predict_churn))
    }));

    match result {
        Ok(router) => Ok(router),
        Err(_) => Err(anyhow::anyhow!("Failed to create predict router"))
            .context("Panic occurred while creating the router"),
    }
}
