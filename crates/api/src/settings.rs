//! Server configuration
//!
//! Defaults, overlaid by an optional TOML file, overlaid by
//! `PERF_QUALITY__*` environment variables (`PERF_QUALITY__SERVER__ADDR`,
//! `PERF_QUALITY__MODEL__DIR`, ...).

use crate::rate_limit::RateLimitConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use feature_schema::SchemaVersion;
use inference_engine::{OnnxModelLoader, DEFAULT_MODEL_FILE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings file used when `PERF_QUALITY_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/perf-quality.toml";

const CONFIG_PATH_VAR: &str = "PERF_QUALITY_CONFIG";
const ENV_PREFIX: &str = "PERF_QUALITY";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
    /// Load the model at startup instead of on the first request
    pub preload_model: bool,
}

/// Model artifact and the schema it was trained on
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub dir: PathBuf,
    pub file: String,
    /// Output holding the class probabilities; first output when unset
    #[serde(default)]
    pub output: Option<String>,
    pub schema_version: SchemaVersion,
}

impl ModelSettings {
    pub fn loader(&self) -> OnnxModelLoader {
        let loader = OnnxModelLoader::new(self.file.clone());
        match &self.output {
            Some(output) => loader.with_output(output.clone()),
            None => loader,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// Seconds to replenish one request
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitSettings {
    /// Limiter configuration, `None` when rate limiting is disabled
    pub fn config(&self) -> Option<RateLimitConfig> {
        self.enabled.then(|| RateLimitConfig {
            per_second: self.per_second,
            burst_size: self.burst_size,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Settings {
    /// Load from `PERF_QUALITY_CONFIG` or the default path, then the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load with a specific settings file; a missing file only leaves defaults in place
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rate_limit = RateLimitConfig::default();
        let config = Config::builder()
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("server.preload_model", true)?
            .set_default("model.dir", "models/mweb-jan-2022-v1")?
            .set_default("model.file", DEFAULT_MODEL_FILE)?
            .set_default("model.schema_version", SchemaVersion::MwebJan2022V1.as_str())?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.per_second", rate_limit.per_second)?
            .set_default("rate_limit.burst_size", rate_limit.burst_size)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
