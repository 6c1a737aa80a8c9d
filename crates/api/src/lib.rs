//! Performance Quality API Server
//!
//! Serves predictions from the performance quality model over HTTP.

use anyhow::{anyhow, Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use inference_engine::Predictor;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};

mod error;
mod rate_limit;
mod routes;
mod settings;

pub use error::{ApiError, ErrorBody};
pub use rate_limit::{create_governor_config, RateLimitConfig};
pub use routes::predictions::PredictResponse;
pub use settings::{LoggingSettings, ModelSettings, Settings, DEFAULT_CONFIG_PATH};

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Arc<Predictor>,
    /// Version string
    pub version: String,
    pub start_time: Instant,
    /// Prometheus recorder handle, when one is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>) -> Self {
        Self {
            predictor,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelStatus,
}

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub schema: String,
    pub loaded: bool,
}

/// Create the application router.
///
/// With a rate limit, the prediction routes are limited per peer IP.
pub fn create_router(state: Arc<AppState>, rate_limit: Option<&RateLimitConfig>) -> Result<Router> {
    let mut predictions = Router::new()
        .route(
            "/api/performanceQuality",
            get(routes::predictions::performance_quality),
        )
        .route("/api/v1/predict", get(routes::predictions::predict));

    if let Some(config) = rate_limit {
        let governor = create_governor_config(config)
            .ok_or_else(|| anyhow!("invalid rate limit {:?}", config))?;
        info!(
            "Rate limiting predictions: burst {}, one request per {}s",
            config.burst_size, config.per_second
        );
        predictions = predictions.layer(GovernorLayer { config: governor });
    }

    Ok(Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(predictions)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let loaded = state.predictor.is_loaded();
    Json(HealthResponse {
        status: if loaded { "healthy" } else { "loading" }.to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelStatus {
            name: state.predictor.model_name().to_string(),
            schema: state.predictor.schema().name().to_string(),
            loaded,
        },
    })
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let level = Level::from_str(&settings.level)
        .map_err(|_| anyhow!("invalid log level {:?}", settings.level))?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    match settings.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => return Err(anyhow!("unknown log format {:?}", other)),
    }
    .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Build the predictor described by the model settings
pub fn build_predictor(settings: &ModelSettings) -> Result<Predictor> {
    Predictor::onnx(&settings.dir, settings.schema_version, settings.loader())
        .with_context(|| format!("Failed to configure predictor for {}", settings.dir.display()))
}

/// Load the model on the blocking pool.
///
/// A failed load is only logged; requests report it (503) and retry the load.
pub async fn preload_model(predictor: Arc<Predictor>) -> bool {
    match tokio::task::spawn_blocking(move || predictor.load_model()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Model not loaded at startup: {}", e);
            false
        }
        Err(e) => {
            warn!("Model preload task failed: {}", e);
            false
        }
    }
}

/// Run the server
pub async fn run_server(settings: Settings) -> Result<()> {
    let predictor = Arc::new(build_predictor(&settings.model)?);
    if settings.server.preload_model {
        preload_model(predictor.clone()).await;
    }

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    let state = Arc::new(AppState::new(predictor).with_metrics(metrics));
    let app = create_router(state, settings.rate_limit.config().as_ref())?;

    info!("Starting API server on {}", settings.server.addr);
    let listener = tokio::net::TcpListener::bind(&settings.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
