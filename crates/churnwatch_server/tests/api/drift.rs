use crate::common::{body_json, error_message, random_customer, TestHelper};
use axum::http::StatusCode;
use churnwatch_types::{DriftReport, HealthStatus, FEATURE_NAMES};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;

const DRIFT_CHECK: &str = "/churnwatch/drift/check";

#[tokio::test]
async fn test_drift_check_without_production_data() {
    let helper = TestHelper::new().await.unwrap();

    let response = helper.get(DRIFT_CHECK).await;
    assert_eq!(response.status(), StatusCode::OK);

    let report: DriftReport = body_json(response).await;

    assert!(report.synthesized);
    assert!(!report.inconclusive);
    assert_eq!(report.production_rows, 100);
    assert_eq!(report.reference_rows, 400);
    assert_eq!(report.features_analyzed, FEATURE_NAMES.len());
    assert!(!report.features.contains_key("Exited"));
    assert_eq!(report.threshold, 0.05);

    for (name, drift) in &report.features {
        assert!((0.0..=1.0).contains(&drift.statistic), "{name}");
        assert!((0.0..=1.0).contains(&drift.p_value), "{name}");
    }
}

#[tokio::test]
async fn test_drift_check_detects_shifted_age() {
    let helper = TestHelper::new().await.unwrap();
    let mut rng = StdRng::seed_from_u64(10);

    for _ in 0..40 {
        let row = random_customer(&mut rng, 40.0);
        assert!(helper.predict(&row).await.recorded);
    }

    let report: DriftReport = body_json(helper.get(DRIFT_CHECK).await).await;

    assert!(!report.synthesized);
    assert_eq!(report.production_rows, 40);
    assert_eq!(report.status, HealthStatus::DriftDetected);

    let age = &report.features["Age"];
    assert!(age.drift_detected);
    assert!(age.p_value < 0.001);
    assert_eq!(age.production_count, 40);
    assert_eq!(
        report.features_drifted,
        report.features.values().filter(|f| f.drift_detected).count()
    );
}

#[tokio::test]
async fn test_drift_check_threshold_param() {
    let helper = TestHelper::new().await.unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..20 {
        helper.predict(&random_customer(&mut rng, 40.0)).await;
    }

    // nothing can fall below a zero threshold
    let response = helper.get(&format!("{DRIFT_CHECK}?threshold=0")).await;
    let report: DriftReport = body_json(response).await;
    assert_eq!(report.threshold, 0.0);
    assert_eq!(report.features_drifted, 0);
    assert_eq!(report.status, HealthStatus::Stable);

    let response = helper.get(&format!("{DRIFT_CHECK}?threshold=0.01")).await;
    let report: DriftReport = body_json(response).await;
    assert_eq!(report.threshold, 0.01);
    assert!(report.features["Age"].drift_detected);
}

#[tokio::test]
async fn test_drift_check_invalid_threshold() {
    let helper = TestHelper::new().await.unwrap();

    let response = helper.get(&format!("{DRIFT_CHECK}?threshold=1.5")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("1.5"));

    let response = helper.get(&format!("{DRIFT_CHECK}?threshold=abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_drift_check_missing_reference() {
    let helper = TestHelper::new().await.unwrap();
    std::fs::remove_file(&helper.state.config.data_settings.reference_path).unwrap();

    let response = helper.get(DRIFT_CHECK).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response).await.contains("bank_churn.csv"));
}

#[tokio::test]
async fn test_drift_check_does_not_modify_production_log() {
    let helper = TestHelper::new().await.unwrap();
    let mut rng = StdRng::seed_from_u64(12);

    for _ in 0..5 {
        helper.predict(&random_customer(&mut rng, 0.0)).await;
    }

    let before = std::fs::read(helper.production_path()).unwrap();
    let first: DriftReport = body_json(helper.get(DRIFT_CHECK).await).await;
    let second: DriftReport = body_json(helper.get(DRIFT_CHECK).await).await;
    let after = std::fs::read(helper.production_path()).unwrap();

    assert_eq!(before, after);
    assert_eq!(first.features, second.features);
}
