//! Per-category scores
//!
//! Every record is scored on all eight categories. A missing average scores 0
//! for that category, and a missing placement takes the lowest tier, so the
//! scorer stays total even on sparse data.

use crate::aggregate::aggregator::ContributorAggregate;
use crate::ingest::normalizer::MAX_AVERAGE_GRADE;
use crate::scoring::tiers::PositionTier;
use crate::types::{Category, GradeEntry, ResultRecord};
use serde::{Deserialize, Serialize};

/// Score of one category, for one record or averaged over a contributor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Average grade scaled to 0-1
    pub avg_score: f64,
    pub position_multiplier: f64,
    /// `avg_score * position_multiplier`
    pub combined_score: f64,
}

impl CategoryScore {
    pub fn from_entry(entry: &GradeEntry) -> Self {
        let avg_score = entry.average.map_or(0.0, |avg| avg / MAX_AVERAGE_GRADE);
        let position_multiplier = PositionTier::from_placement(entry.result).multiplier();

        Self {
            avg_score,
            position_multiplier,
            combined_score: avg_score * position_multiplier,
        }
    }
}

/// Category scores of a single record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordScores {
    scores: [CategoryScore; Category::COUNT],
}

impl RecordScores {
    pub fn get(&self, category: Category) -> &CategoryScore {
        &self.scores[category as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryScore)> {
        Category::ALL.into_iter().zip(self.scores.iter())
    }
}

/// One category's explainable summary for a contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub weight: f64,
    /// Mean normalized average over all records
    pub avg_score: f64,
    /// Mean combined score over all records
    pub combined_score: f64,
    /// Mean raw 0-5 average over records that were graded
    pub mean_average: Option<f64>,
    /// Mean placement over records that were placed
    pub mean_placement: Option<f64>,
    pub best_placement: Option<u32>,
}

/// Scores records and contributors per category
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryScorer;

impl CategoryScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score every category of a record
    pub fn score_record(&self, record: &ResultRecord) -> RecordScores {
        let mut scores = [CategoryScore::default(); Category::COUNT];
        for (category, entry) in record.grades.iter() {
            scores[category as usize] = CategoryScore::from_entry(entry);
        }
        RecordScores { scores }
    }

    /// Average each category over a contributor's records
    ///
    /// Returns one summary per category in grade-code order. A contributor
    /// without records gets all-zero scores.
    pub fn summarize(&self, aggregate: &ContributorAggregate) -> Vec<CategorySummary> {
        let record_scores: Vec<RecordScores> = aggregate
            .records
            .iter()
            .map(|record| self.score_record(record))
            .collect();
        let entries = record_scores.len();

        Category::ALL
            .into_iter()
            .map(|category| {
                let avg_total =
                    ordered_sum(record_scores.iter().map(|s| s.get(category).avg_score));
                let combined_total =
                    ordered_sum(record_scores.iter().map(|s| s.get(category).combined_score));

                let averages: Vec<f64> = aggregate
                    .records
                    .iter()
                    .filter_map(|record| record.grades.get(category).average)
                    .collect();
                let placements: Vec<u32> = aggregate
                    .records
                    .iter()
                    .filter_map(|record| record.grades.get(category).result)
                    .collect();

                CategorySummary {
                    category,
                    weight: category.weight(),
                    avg_score: safe_mean(avg_total, entries),
                    combined_score: safe_mean(combined_total, entries),
                    mean_average: optional_mean(ordered_sum(averages.iter().copied()), averages.len()),
                    mean_placement: optional_mean(
                        placements.iter().map(|p| f64::from(*p)).sum(),
                        placements.len(),
                    ),
                    best_placement: placements.iter().min().copied(),
                }
            })
            .collect()
    }
}

/// Sum in ascending value order, so equal multisets give bit-identical totals
pub(crate) fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

/// Mean that yields 0 for an empty population
pub(crate) fn safe_mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn optional_mean(total: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| total / count as f64)
}
