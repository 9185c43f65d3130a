use crate::api::error::ServerError;
use crate::api::routes::drift::schema::DriftCheckParams;
use crate::api::state::AppState;
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use churnwatch_types::{validate_threshold, DriftReport, HealthStatus};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, instrument, warn};

#[instrument(skip_all)]
pub async fn check_drift(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DriftCheckParams>,
) -> Result<Json<DriftReport>, ServerError> {
    let threshold = params
        .threshold
        .unwrap_or(state.config.drift_settings.default_threshold);
    let threshold = validate_threshold(threshold).map_err(|e| {
        warn!("Rejected drift check: {}", e);
        ServerError::DriftError(e.into())
    })?;

    let evaluator = state.evaluator.clone();
    let reference_path = state.config.data_settings.reference_path.clone();
    let production_path = state.production_log.path().to_path_buf();

    let report = tokio::task::spawn_blocking(move || {
        evaluator.evaluate(&reference_path, &production_path, threshold)
    })
    .await?
    .inspect_err(|e| error!("Drift check failed: {}", e))?;

    if report.synthesized {
        warn!("Drift report was computed against a synthesized production sample");
    }

    if report.status == HealthStatus::DriftDetected {
        metrics::counter!("churnwatch_drift_detected_total").increment(1);
    }
    metrics::counter!("churnwatch_drift_checks_total").increment(1);

    Ok(Json(report))
}

pub async fn get_drift_router(prefix: &str) -> Result<Router<Arc<AppState>>> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        Router::new().route(&format!("{}/drift/check", prefix), get(check_drift))
    }));

    match result {
        Ok(router) => Ok(router),
        Err(_) => Err(anyhow::anyhow!("Failed to create drift router"))
            .context("Panic occurred while creating the router"),
    }
}
