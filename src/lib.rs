//! Jam Ranker - composite contributor rankings for game-jam result datasets
//!
//! This crate normalizes raw game-jam result records, attributes them to
//! contributors, scores each contributor per judging category and ranks them
//! by a weighted composite of participation, community engagement and
//! performance.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod sources;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use aggregate::{AggregateSet, Aggregator, DuplicateReport};
pub use ingest::RecordNormalizer;
pub use pipeline::{RankingOutcome, RankingPipeline, SourceBatch};
pub use ranking::{CompositeRanker, RankedContributor};
pub use sources::{InMemorySource, JsonFileSource, RecordSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
