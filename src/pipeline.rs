//! End-to-end ranking pipeline
//!
//! raw records → normalizer → aggregator → category scorer → composite ranker.
//!
//! Normalization may run per source in parallel because sources are
//! independent. The aggregate map is always built on one thread, in source
//! order, so parallel and sequential runs produce identical output.

use crate::aggregate::{Aggregator, DuplicateReport};
use crate::error::{RankingError, Result};
use crate::ingest::{NormalizationStats, NormalizedBatch, RecordNormalizer};
use crate::metrics::PipelineMetrics;
use crate::ranking::{CompositeRanker, RankedContributor};
use crate::types::RawRecord;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Raw records of one source, tagged with their provenance
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub source_tag: String,
    pub records: Vec<RawRecord>,
}

impl SourceBatch {
    pub fn new(source_tag: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            source_tag: source_tag.into(),
            records,
        }
    }
}

/// Summary counters of one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub sources: usize,
    pub normalization: NormalizationStats,
    pub contributors: usize,
    pub cross_file_duplicates: usize,
    pub duration: Duration,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub rankings: Vec<RankedContributor>,
    /// Present only when requested
    pub duplicates: Option<DuplicateReport>,
    pub stats: RunStats,
}

/// Options that change what a run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Build the cross-file duplicate report
    pub include_duplicates: bool,
    /// Upper bound on sources normalized at the same time
    pub max_concurrent_sources: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            include_duplicates: false,
            max_concurrent_sources: 4,
        }
    }
}

/// Batch ranking pipeline, one run per dataset snapshot
#[derive(Clone, Default)]
pub struct RankingPipeline {
    normalizer: RecordNormalizer,
    ranker: CompositeRanker,
    options: PipelineOptions,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl RankingPipeline {
    pub fn new(
        normalizer: RecordNormalizer,
        ranker: CompositeRanker,
        options: PipelineOptions,
    ) -> Self {
        Self {
            normalizer,
            ranker,
            options,
            metrics: None,
        }
    }

    /// Record run statistics into the given collector
    pub fn with_metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run the whole pipeline on the calling thread
    pub fn run(&self, batches: &[SourceBatch]) -> RankingOutcome {
        let started = Instant::now();
        let normalized = batches
            .iter()
            .map(|batch| self.normalizer.normalize_batch(&batch.source_tag, &batch.records))
            .collect();

        self.finish(normalized, started)
    }

    /// Normalize sources on the blocking pool, then merge and rank in source order
    pub async fn run_parallel(&self, batches: Vec<SourceBatch>) -> Result<RankingOutcome> {
        let started = Instant::now();
        let limit = self.options.max_concurrent_sources.max(1);

        let results: Vec<_> = stream::iter(batches)
            .map(|batch| {
                let normalizer = self.normalizer.clone();
                tokio::task::spawn_blocking(move || {
                    normalizer.normalize_batch(&batch.source_tag, &batch.records)
                })
            })
            .buffered(limit)
            .collect()
            .await;

        let mut normalized = Vec::with_capacity(results.len());
        for result in results {
            let batch = result.map_err(|e| RankingError::InternalError {
                message: format!("normalization task failed: {}", e),
            })?;
            normalized.push(batch);
        }

        Ok(self.finish(normalized, started))
    }

    fn finish(&self, normalized: Vec<NormalizedBatch>, started: Instant) -> RankingOutcome {
        let mut stats = RunStats {
            sources: normalized.len(),
            ..RunStats::default()
        };

        let mut aggregator = Aggregator::new();
        for batch in normalized {
            if batch.stats.records_accepted == 0 {
                warn!("Source {} contributed no usable records", batch.source_tag);
            }
            stats.normalization.merge(&batch.stats);
            aggregator.ingest_all(batch.pairs);
        }

        let aggregates = aggregator.finish();
        let rankings = self.ranker.rank(&aggregates);

        let duplicates = DuplicateReport::from_aggregates(&aggregates);
        stats.contributors = aggregates.len();
        stats.cross_file_duplicates = duplicates.len();
        stats.duration = started.elapsed();

        info!(
            "Ranked {} contributors from {} sources ({} records accepted, {} dropped, {} cross-file duplicates)",
            stats.contributors,
            stats.sources,
            stats.normalization.records_accepted,
            stats.normalization.records_dropped,
            stats.cross_file_duplicates
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_run(&stats);
        }

        RankingOutcome {
            rankings,
            duplicates: self.options.include_duplicates.then_some(duplicates),
            stats,
        }
    }
}
