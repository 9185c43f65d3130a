use axum::response::Response;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use churnwatch_model::LogisticModel;
use churnwatch_server::api::state::AppState;
use churnwatch_server::create_app;
use churnwatch_settings::{ChurnwatchServerConfig, DataSettings, LogSettings, ModelSettings};
use churnwatch_types::{FeatureRow, PredictionResponse, FEATURE_NAMES, LABEL_COLUMN};
use http_body_util::BodyExt;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::{Rng, SeedableRng};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const REFERENCE_ROWS: usize = 400;

/// A plausible bank customer; `age_shift` moves the whole age distribution
pub fn random_customer(rng: &mut StdRng, age_shift: f64) -> FeatureRow {
    let geography = rng.gen_range(0..3);

    FeatureRow {
        credit_score: rng.gen_range(350..=850) as f64,
        age: rng.gen_range(18..=70) as f64 + age_shift,
        tenure: rng.gen_range(0..=10) as f64,
        balance: if rng.gen_bool(0.35) {
            0.0
        } else {
            rng.gen_range(20_000.0..220_000.0)
        },
        num_of_products: rng.gen_range(1..=4) as f64,
        has_cr_card: rng.gen_bool(0.7) as u8 as f64,
        is_active_member: rng.gen_bool(0.5) as u8 as f64,
        estimated_salary: rng.gen_range(10_000.0..200_000.0),
        geography_germany: (geography == 1) as u8 as f64,
        geography_spain: (geography == 2) as u8 as f64,
    }
}

pub fn write_reference(path: &Path, n_rows: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = csv::Writer::from_path(path).unwrap();

    let mut header = FEATURE_NAMES.to_vec();
    header.push(LABEL_COLUMN);
    writer.write_record(&header).unwrap();

    for _ in 0..n_rows {
        let row = random_customer(&mut rng, 0.0);
        let mut record = row
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        record.push((rng.gen_bool(0.2) as u8).to_string());
        writer.write_record(&record).unwrap();
    }

    writer.flush().unwrap();
}

pub fn write_model(path: &Path) {
    let model = LogisticModel {
        feature_names: FEATURE_NAMES.map(String::from).to_vec(),
        coefficients: vec![
            -0.001, 0.07, -0.02, 0.000003, -0.1, -0.05, -1.0, 0.0, 0.8, 0.05,
        ],
        intercept: -2.5,
        scaler: None,
    };
    std::fs::write(path, serde_json::to_string(&model).unwrap()).unwrap();
}

pub struct TestHelper {
    app: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

impl TestHelper {
    pub fn config(dir: &Path) -> ChurnwatchServerConfig {
        let mut config = ChurnwatchServerConfig::default();

        config.data_settings = DataSettings {
            reference_path: dir.join("bank_churn.csv"),
            production_path: dir.join("production_data.csv"),
        };
        config.model_settings = ModelSettings {
            model_path: dir.join("churn_model.json"),
        };
        config.log_settings = LogSettings {
            log_level: "info".to_string(),
            log_json: false,
        };

        config
    }

    pub async fn new() -> Result<Self, anyhow::Error> {
        Self::with_config(|_| {}).await
    }

    /// Build the app over a fresh temp dir holding a reference dataset and a
    /// model artifact, after letting the caller adjust the config
    pub async fn with_config<F>(adjust: F) -> Result<Self, anyhow::Error>
    where
        F: FnOnce(&mut ChurnwatchServerConfig),
    {
        let dir = TempDir::new()?;
        let mut config = Self::config(dir.path());

        write_reference(&config.data_settings.reference_path, REFERENCE_ROWS, 42);
        write_model(&config.model_settings.model_path);
        adjust(&mut config);

        let (app, state) = create_app(config).await?;

        Ok(Self { app, state, dir })
    }

    pub fn production_path(&self) -> PathBuf {
        self.state.production_log.path().to_path_buf()
    }

    pub async fn send_oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: String) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        self.send_oneshot(request).await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send_oneshot(request).await
    }

    pub async fn predict(&self, row: &FeatureRow) -> PredictionResponse {
        let response = self
            .post_json("/churnwatch/predict", serde_json::to_string(row).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn error_message(response: Response<Body>) -> String {
    let value: Value = body_json(response).await;
    assert_eq!(value["status"], "error");
    value["message"].as_str().unwrap_or_default().to_string()
}
