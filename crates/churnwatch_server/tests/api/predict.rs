use crate::common::{body_json, error_message, random_customer, TestHelper};
use axum::http::StatusCode;
use churnwatch_log::ProductionLog;
use churnwatch_model::{ChurnClassifier, ModelError};
use churnwatch_server::create_app_with_model;
use churnwatch_types::{FeatureRow, RiskLevel, FEATURE_NAMES};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_predict_records_row() {
    let helper = TestHelper::new().await.unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let row = random_customer(&mut rng, 0.0);

    assert!(!helper.production_path().exists());

    let prediction = helper.predict(&row).await;

    assert!((0.0..=1.0).contains(&prediction.churn_probability));
    assert_eq!(
        prediction.risk_level,
        RiskLevel::from_probability(prediction.churn_probability)
    );
    assert!(prediction.recorded);

    let content = std::fs::read_to_string(helper.production_path()).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), FEATURE_NAMES.join(","));
    assert_eq!(lines.count(), 1);

    let rows = ProductionLog::new(helper.production_path()).read_rows().unwrap();
    assert_eq!(rows, vec![row]);
}

#[tokio::test]
async fn test_predict_appends_in_order() {
    let helper = TestHelper::new().await.unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    let rows = (0..5)
        .map(|_| random_customer(&mut rng, 0.0))
        .collect::<Vec<_>>();

    for row in &rows {
        assert!(helper.predict(row).await.recorded);
    }

    let logged = helper.state.production_log.read_rows().unwrap();
    assert_eq!(logged, rows);
}

#[tokio::test]
async fn test_predict_risk_levels() {
    let helper = TestHelper::new().await.unwrap();

    let mut young_active = random_customer(&mut StdRng::seed_from_u64(3), 0.0);
    young_active.age = 22.0;
    young_active.is_active_member = 1.0;
    young_active.geography_germany = 0.0;

    let mut older_inactive = young_active;
    older_inactive.age = 80.0;
    older_inactive.is_active_member = 0.0;
    older_inactive.geography_germany = 1.0;
    older_inactive.geography_spain = 0.0;

    let low = helper.predict(&young_active).await;
    let high = helper.predict(&older_inactive).await;

    assert!(low.churn_probability < high.churn_probability);
    assert_eq!(high.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_predict_rejects_invalid_rows() {
    let helper = TestHelper::new().await.unwrap();
    let mut row = random_customer(&mut StdRng::seed_from_u64(4), 0.0);
    row.has_cr_card = 2.0;

    let response = helper
        .post_json("/churnwatch/predict", serde_json::to_string(&row).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(response).await.contains("HasCrCard"));

    // missing field
    let mut payload: Value = serde_json::to_value(row).unwrap();
    payload.as_object_mut().unwrap().remove("Age");
    let response = helper
        .post_json("/churnwatch/predict", payload.to_string())
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // nothing was logged
    assert!(!helper.production_path().exists());
}

#[tokio::test]
async fn test_predict_survives_log_failure() {
    let helper = TestHelper::with_config(|config| {
        // a regular file standing where the log directory should be
        let blocker = config.data_settings.reference_path.clone();
        config.data_settings.production_path = blocker.join("production_data.csv");
    })
    .await
    .unwrap();

    let row = random_customer(&mut StdRng::seed_from_u64(5), 0.0);
    let prediction = helper.predict(&row).await;

    assert!(!prediction.recorded);
    assert!((0.0..=1.0).contains(&prediction.churn_probability));
}

#[derive(Debug)]
struct BrokenModel;

impl ChurnClassifier for BrokenModel {
    fn predict_proba(&self, _row: &FeatureRow) -> Result<f64, ModelError> {
        Err(ModelError::NonFiniteProbability)
    }
}

#[tokio::test]
async fn test_predict_model_failure() {
    let helper = TestHelper::new().await.unwrap();
    let config = TestHelper::config(helper.dir.path());
    let (app, state) = create_app_with_model(config, Arc::new(BrokenModel))
        .await
        .unwrap();

    let row = random_customer(&mut StdRng::seed_from_u64(6), 0.0);
    let request = axum::http::Request::builder()
        .uri("/churnwatch/predict")
        .method("POST")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_string(&row).unwrap()))
        .unwrap();

    let response = tower::util::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(!state.production_log.exists());
}
