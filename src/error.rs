//! Error types for the ranking pipeline
//!
//! Per-record problems are recovered inside the normalizer and never show up
//! here. These errors only cover the I/O boundaries: sources, outputs and
//! configuration.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific pipeline scenarios
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Failed to load source {source_tag}: {message}")]
    SourceLoadFailed { source_tag: String, message: String },

    #[error("Source discovery failed in {directory}: {message}")]
    SourceDiscoveryFailed { directory: String, message: String },

    #[error("Failed to write output {path}: {message}")]
    OutputFailed { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal pipeline error: {message}")]
    InternalError { message: String },
}
