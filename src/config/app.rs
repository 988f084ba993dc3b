//! Main application configuration
//!
//! This module defines the configuration structures for the jam-ranker batch
//! tool, including TOML file and environment variable loading and validation.

use crate::error::RankingError;
use crate::ingest::NormalizerConfig;
use crate::pipeline::PipelineOptions;
use crate::sources::FileFormat;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in logs
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where snapshots are read from and how their records are shaped
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Directory holding the snapshot files
    pub data_dir: PathBuf,
    /// Snapshot file name prefix
    pub file_prefix: String,
    /// Snapshot file extension (json, jsonl, ndjson)
    pub file_extension: String,
    /// Field holding the contributor identity
    pub identity_field: String,
    /// Field holding the event version
    pub event_version_field: String,
    /// Normalize sources on the blocking pool
    pub parallel_normalization: bool,
    /// Sources loaded or normalized at the same time
    pub max_concurrent_sources: usize,
}

/// Where results are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Ranked contributors (JSON)
    pub rankings_path: PathBuf,
    /// Cross-file duplicate report (JSON), skipped when unset
    pub duplicates_path: Option<PathBuf>,
    /// Scoring legend (text), skipped when unset
    pub legend_path: Option<PathBuf>,
    /// Prometheus text exposition of run metrics, skipped when unset
    pub metrics_path: Option<PathBuf>,
    /// Pretty-print JSON outputs
    pub pretty: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "jam-ranker".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        let normalizer = NormalizerConfig::default();
        Self {
            data_dir: PathBuf::from("."),
            file_prefix: "ludum_dare_games_".to_string(),
            file_extension: "json".to_string(),
            identity_field: normalizer.identity_field,
            event_version_field: normalizer.event_version_field,
            parallel_normalization: true,
            max_concurrent_sources: PipelineOptions::default().max_concurrent_sources,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            rankings_path: PathBuf::from("ranked_authors.json"),
            duplicates_path: None,
            legend_path: None,
            metrics_path: None,
            pretty: true,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RankingError::ConfigurationError {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;
        let mut config: AppConfig =
            toml::from_str(&contents).map_err(|e| RankingError::ConfigurationError {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Input settings
        if let Ok(dir) = env::var("JAM_DATA_DIR") {
            self.input.data_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = env::var("JAM_FILE_PREFIX") {
            self.input.file_prefix = prefix;
        }
        if let Ok(extension) = env::var("JAM_FILE_EXTENSION") {
            self.input.file_extension = extension;
        }
        if let Ok(field) = env::var("JAM_IDENTITY_FIELD") {
            self.input.identity_field = field;
        }
        if let Ok(field) = env::var("JAM_EVENT_VERSION_FIELD") {
            self.input.event_version_field = field;
        }
        if let Ok(parallel) = env::var("JAM_PARALLEL_NORMALIZATION") {
            self.input.parallel_normalization = parse_env("JAM_PARALLEL_NORMALIZATION", &parallel)?;
        }
        if let Ok(max) = env::var("JAM_MAX_CONCURRENT_SOURCES") {
            self.input.max_concurrent_sources = parse_env("JAM_MAX_CONCURRENT_SOURCES", &max)?;
        }

        // Output settings
        if let Ok(path) = env::var("JAM_RANKINGS_PATH") {
            self.output.rankings_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("JAM_DUPLICATES_PATH") {
            self.output.duplicates_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("JAM_LEGEND_PATH") {
            self.output.legend_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("JAM_METRICS_PATH") {
            self.output.metrics_path = Some(PathBuf::from(path));
        }
        if let Ok(pretty) = env::var("JAM_PRETTY_OUTPUT") {
            self.output.pretty = parse_env("JAM_PRETTY_OUTPUT", &pretty)?;
        }

        Ok(())
    }

    /// Field names for the record normalizer
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            identity_field: self.input.identity_field.clone(),
            event_version_field: self.input.event_version_field.clone(),
        }
    }

    /// Pipeline options derived from input and output settings
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            include_duplicates: self.output.duplicates_path.is_some(),
            max_concurrent_sources: self.input.max_concurrent_sources,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate input settings
    if FileFormat::from_extension(&config.input.file_extension).is_none() {
        return Err(anyhow!(
            "Unsupported file extension: {}",
            config.input.file_extension
        ));
    }
    if config.input.identity_field.trim().is_empty() {
        return Err(anyhow!("Identity field cannot be empty"));
    }
    if config.input.event_version_field.trim().is_empty() {
        return Err(anyhow!("Event version field cannot be empty"));
    }
    if config.input.max_concurrent_sources == 0 {
        return Err(anyhow!("Max concurrent sources must be greater than 0"));
    }

    // Validate output settings
    if config.output.rankings_path.as_os_str().is_empty() {
        return Err(anyhow!("Rankings path cannot be empty"));
    }

    Ok(())
}
