//! Record normalization
//!
//! Turns raw result records into canonical [`ResultRecord`](crate::types::ResultRecord)s
//! and emits one (record, identity) pair per credited contributor.

pub mod identity;
pub mod normalizer;

// Re-export commonly used types
pub use identity::IdentityField;
pub use normalizer::{NormalizationStats, NormalizedBatch, NormalizerConfig, RecordNormalizer};
