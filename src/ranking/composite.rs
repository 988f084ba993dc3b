//! Composite sub-scores
//!
//! Performance is divided by the sum of all eight category weights even when
//! some categories never appear in the dataset, so sparse data deflates the
//! composite instead of being renormalized.

use crate::scoring::category::{ordered_sum, safe_mean, CategorySummary};
use crate::types::{Category, ResultRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound of the participation score
pub const PARTICIPATION_CAP: f64 = 5.0;

/// Appearance count assumed when none is known
pub const DEFAULT_APPEARANCE_COUNT: u32 = 1;

/// Scale of the composite score
pub const COMPOSITE_SCALE: f64 = 100.0;

/// Weights of the three composite components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub participation: f64,
    pub community: f64,
    pub performance: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            participation: 0.10,
            community: 0.10,
            performance: 0.80,
        }
    }
}

/// All sub-scores of one contributor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributorScores {
    pub participation_score: f64,
    pub community_score: f64,
    pub performance_score: f64,
    pub composite_score: f64,
}

impl ContributorScores {
    pub fn compute(
        appearance_count: Option<u32>,
        records: &[Arc<ResultRecord>],
        categories: &[CategorySummary],
        weights: &ComponentWeights,
    ) -> Self {
        let participation_score = participation_score(appearance_count);
        let community_score = community_score(records);
        let performance_score = performance_score(categories);

        Self {
            participation_score,
            community_score,
            performance_score,
            composite_score: composite_score(
                participation_score,
                community_score,
                performance_score,
                weights,
            ),
        }
    }
}

/// Sum of all category weights, the fixed performance denominator
pub fn total_category_weight() -> f64 {
    Category::ALL.iter().map(|category| category.weight()).sum()
}

/// Appearance count clamped to `[0, PARTICIPATION_CAP]`
pub fn participation_score(appearance_count: Option<u32>) -> f64 {
    f64::from(appearance_count.unwrap_or(DEFAULT_APPEARANCE_COUNT)).clamp(0.0, PARTICIPATION_CAP)
}

/// Mean of every present `cool` and `given` value across the records
pub fn community_score(records: &[Arc<ResultRecord>]) -> f64 {
    let values: Vec<f64> = records
        .iter()
        .flat_map(|record| record.community.engagement_values())
        .collect();
    safe_mean(ordered_sum(values.iter().copied()), values.len())
}

/// Weighted mean of category combined scores over the fixed weight total
pub fn performance_score(categories: &[CategorySummary]) -> f64 {
    let total_weight = total_category_weight();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = categories
        .iter()
        .map(|summary| summary.combined_score * summary.category.weight())
        .sum();
    weighted / total_weight
}

pub fn composite_score(
    participation: f64,
    community: f64,
    performance: f64,
    weights: &ComponentWeights,
) -> f64 {
    COMPOSITE_SCALE
        * (weights.participation * participation
            + weights.community * community
            + weights.performance * performance)
}
