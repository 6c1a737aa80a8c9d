//! Prediction Routes

use axum::{
    extract::{Query, State},
    Json,
};
use feature_pipeline::RawRecord;
use inference_engine::{PerformanceClass, PredictionResult};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Response for the versioned prediction endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probabilities: PredictionResult,
    pub label: Option<PerformanceClass>,
    pub confidence: Option<f32>,
    pub model: String,
}

/// Query string values all arrive as text; the pipeline parses numeric fields
/// and treats empty values as missing.
fn raw_record(params: HashMap<String, String>) -> RawRecord {
    params.into_iter().collect()
}

async fn run_prediction(
    state: &AppState,
    params: HashMap<String, String>,
) -> Result<PredictionResult, ApiError> {
    let raw = raw_record(params);
    let predictor = state.predictor.clone();
    let result = tokio::task::spawn_blocking(move || predictor.predict(&raw)).await??;
    Ok(result)
}

/// `GET /api/performanceQuality`, class index → probability
pub async fn performance_quality(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PredictionResult>, ApiError> {
    run_prediction(&state, params).await.map(Json)
}

/// `GET /api/v1/predict`
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let probabilities = run_prediction(&state, params).await?;
    let label = probabilities.label();

    Ok(Json(PredictResponse {
        label: label.map(|l| l.class),
        confidence: label.map(|l| l.confidence),
        model: state.predictor.model_name().to_string(),
        probabilities,
    }))
}
