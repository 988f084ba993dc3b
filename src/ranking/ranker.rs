//! Composite ranker
//!
//! Ranks are dense "min" ranks: tied scores share a rank and the next distinct
//! score resumes at (number of strictly better contributors + 1). Output is
//! ordered by rank, ties broken by identity, so repeated runs are identical.

use crate::aggregate::aggregator::{AggregateSet, ContributorAggregate};
use crate::ranking::composite::{ComponentWeights, ContributorScores};
use crate::scoring::category::{CategoryScorer, CategorySummary};
use crate::types::ContributorId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Final output row for one contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedContributor {
    pub rank: u32,
    pub identity: ContributorId,
    pub composite_score: f64,
    pub participation_score: f64,
    pub community_score: f64,
    pub performance_score: f64,
    pub appearance_count: u32,
    pub average_team_size: f64,
    pub unique_events: usize,
    pub unique_games: usize,
    pub team_sizes: Vec<u32>,
    pub game_links: Vec<String>,
    pub event_versions: Vec<u32>,
    pub source_tags: Vec<String>,
    /// One summary per category in grade-code order
    pub categories: Vec<CategorySummary>,
}

impl RankedContributor {
    fn unranked(
        aggregate: &ContributorAggregate,
        scores: ContributorScores,
        categories: Vec<CategorySummary>,
    ) -> Self {
        Self {
            rank: 0,
            identity: aggregate.identity,
            composite_score: scores.composite_score,
            participation_score: scores.participation_score,
            community_score: scores.community_score,
            performance_score: scores.performance_score,
            appearance_count: aggregate.appearance_count,
            average_team_size: aggregate.average_team_size(),
            unique_events: aggregate.event_versions.len(),
            unique_games: aggregate.game_links.len(),
            team_sizes: aggregate.team_sizes.clone(),
            game_links: aggregate.game_links.iter().cloned().collect(),
            event_versions: aggregate.event_versions.iter().copied().collect(),
            source_tags: aggregate.source_tags.iter().cloned().collect(),
            categories,
        }
    }
}

/// Scores and ranks every contributor of a run
#[derive(Debug, Clone, Default)]
pub struct CompositeRanker {
    scorer: CategoryScorer,
    weights: ComponentWeights,
}

impl CompositeRanker {
    pub fn new(weights: ComponentWeights) -> Self {
        Self {
            scorer: CategoryScorer::new(),
            weights,
        }
    }

    /// Score one contributor without assigning a rank
    pub fn score(&self, aggregate: &ContributorAggregate) -> ContributorScores {
        let categories = self.scorer.summarize(aggregate);
        ContributorScores::compute(
            Some(aggregate.appearance_count),
            &aggregate.records,
            &categories,
            &self.weights,
        )
    }

    /// Rank all contributors, ordered by rank then identity
    pub fn rank(&self, aggregates: &AggregateSet) -> Vec<RankedContributor> {
        let mut rows: Vec<RankedContributor> = aggregates
            .iter()
            .map(|aggregate| {
                let categories = self.scorer.summarize(aggregate);
                let scores = ContributorScores::compute(
                    Some(aggregate.appearance_count),
                    &aggregate.records,
                    &categories,
                    &self.weights,
                );
                RankedContributor::unranked(aggregate, scores, categories)
            })
            .collect();

        rows.sort_by(|a, b| {
            compare_scores_desc(a.composite_score, b.composite_score)
                .then_with(|| a.identity.cmp(&b.identity))
        });

        let scores: Vec<f64> = rows.iter().map(|row| row.composite_score).collect();
        for (row, rank) in rows.iter_mut().zip(assign_dense_min_ranks(&scores)) {
            row.rank = rank;
        }

        debug!("Ranked {} contributors", rows.len());
        rows
    }
}

fn compare_scores_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Dense "min" ranks for scores in any order, higher score ranks first
///
/// Equal scores share a rank; each rank equals the number of strictly higher
/// scores plus one. Ranks are returned in input order.
pub fn assign_dense_min_ranks(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare_scores_desc(scores[a], scores[b]));

    let mut ranks = vec![0u32; scores.len()];
    let mut current_rank = 0u32;
    let mut previous: Option<f64> = None;

    for (position, &index) in order.iter().enumerate() {
        let score = scores[index];
        if previous != Some(score) {
            current_rank = position as u32 + 1;
            previous = Some(score);
        }
        ranks[index] = current_rank;
    }

    ranks
}
