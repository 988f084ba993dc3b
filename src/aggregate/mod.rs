//! Identity resolution and per-contributor aggregation
//!
//! This module merges (record, identity) pairs from every source into one
//! [`ContributorAggregate`] per contributor, and extracts the cross-file
//! duplicate report used for data-quality review.

pub mod aggregator;
pub mod duplicates;

// Re-export commonly used types
pub use aggregator::{AggregateSet, Aggregator, ContributorAggregate};
pub use duplicates::{DuplicateEntry, DuplicateReport};
