use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use churnwatch_drift::DriftError;
use churnwatch_log::LogError;
use churnwatch_model::ModelError;
use churnwatch_types::TypeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    DriftError(#[from] DriftError),

    #[error(transparent)]
    ModelError(#[from] ModelError),

    #[error(transparent)]
    LogError(#[from] LogError),

    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::TypeError(TypeError::InvalidThreshold(_))
            | ServerError::DriftError(DriftError::TypeError(TypeError::InvalidThreshold(_))) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::TypeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::ModelError(ModelError::TypeError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
