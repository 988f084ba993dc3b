//! Configuration management for jam-ranker
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the ranking tool.

pub mod app;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, InputSettings, OutputSettings, ServiceSettings};
