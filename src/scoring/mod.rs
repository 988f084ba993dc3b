//! Category scoring
//!
//! Per-category normalized grades, tiered placement multipliers, and the
//! scoring legend describing both.

pub mod category;
pub mod legend;
pub mod tiers;

// Re-export commonly used types
pub use category::{CategoryScore, CategoryScorer, CategorySummary, RecordScores};
pub use legend::ScoringLegend;
pub use tiers::PositionTier;
