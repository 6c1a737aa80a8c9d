//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::PredictorError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Prediction(#[from] PredictorError),
    #[error("Prediction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub stage: &'static str,
}

impl ApiError {
    pub fn stage(&self) -> &'static str {
        match self {
            ApiError::Prediction(e) => e.stage(),
            ApiError::Task(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.stage() {
            "validation" => StatusCode::BAD_REQUEST,
            "model_load" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Prediction failed: {}", self);
        } else {
            warn!("Rejected prediction request: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            stage: self.stage(),
        };
        (status, Json(body)).into_response()
    }
}
