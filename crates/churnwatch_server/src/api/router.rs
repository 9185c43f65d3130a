use crate::api::middleware::track_metrics;
use crate::api::routes::{get_drift_router, get_health_router, get_predict_router};
use crate::api::state::AppState;
use anyhow::Result;
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

const ROUTE_PREFIX: &str = "/churnwatch";

pub async fn create_router(app_state: Arc<AppState>) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);

    let health_routes = get_health_router(ROUTE_PREFIX).await?;
    let predict_routes = get_predict_router(ROUTE_PREFIX).await?;
    let drift_routes = get_drift_router(ROUTE_PREFIX).await?;

    let router = Router::new()
        .merge(health_routes)
        .merge(predict_routes)
        .merge(drift_routes)
        .route_layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .with_state(app_state);

    Ok(router)
}
