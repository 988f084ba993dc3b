//! Metrics for the ranking pipeline
//!
//! Run counters are kept in a Prometheus registry and exported in the text
//! exposition format; there is no HTTP endpoint.

pub mod collector;

pub use collector::{PipelineMetrics, RecordMetrics, RunMetrics};
