//! Composite ranking
//!
//! Combines participation, community and performance sub-scores into one
//! composite score per contributor and assigns dense "min" ranks.

pub mod composite;
pub mod ranker;

// Re-export commonly used types
pub use composite::{ComponentWeights, ContributorScores};
pub use ranker::{assign_dense_min_ranks, CompositeRanker, RankedContributor};
