//! Metrics collection using Prometheus
//!
//! Counters describing one ranking run: how many records were read, repaired
//! or dropped, and what the run produced.

use crate::pipeline::RunStats;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Main metrics collector for the ranking pipeline
#[derive(Clone)]
pub struct PipelineMetrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Record-level metrics
    record_metrics: RecordMetrics,

    /// Run-level metrics
    run_metrics: RunMetrics,
}

/// Record-level metrics
#[derive(Clone)]
pub struct RecordMetrics {
    /// Records by outcome (seen, accepted, dropped)
    pub records_total: IntCounterVec,

    /// Identity fields that could not be decoded
    pub malformed_identities_total: IntCounter,

    /// (record, identity) pairs emitted by the normalizer
    pub identity_pairs_total: IntCounter,

    /// Numeric fields treated as missing after failing to parse
    pub invalid_numeric_fields_total: IntCounter,
}

/// Run-level metrics
#[derive(Clone)]
pub struct RunMetrics {
    /// Sources consumed
    pub sources_total: IntCounter,

    /// Contributors in the last ranking
    pub contributors_ranked: IntGauge,

    /// Contributors found in more than one source in the last run
    pub cross_file_duplicates: IntGauge,

    /// End-to-end pipeline duration
    pub run_duration_seconds: Histogram,
}

impl PipelineMetrics {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let record_metrics = RecordMetrics::new(&registry)?;
        let run_metrics = RunMetrics::new(&registry)?;

        Ok(Self {
            registry,
            record_metrics,
            run_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get record metrics
    pub fn records(&self) -> &RecordMetrics {
        &self.record_metrics
    }

    /// Get run metrics
    pub fn run(&self) -> &RunMetrics {
        &self.run_metrics
    }

    /// Update metrics from the stats of a finished run
    pub fn record_run(&self, stats: &RunStats) {
        let normalization = &stats.normalization;

        self.record_metrics
            .records_total
            .with_label_values(&["seen"])
            .inc_by(normalization.records_seen);
        self.record_metrics
            .records_total
            .with_label_values(&["accepted"])
            .inc_by(normalization.records_accepted);
        self.record_metrics
            .records_total
            .with_label_values(&["dropped"])
            .inc_by(normalization.records_dropped);

        self.record_metrics
            .malformed_identities_total
            .inc_by(normalization.malformed_identities);
        self.record_metrics
            .identity_pairs_total
            .inc_by(normalization.identity_pairs);
        self.record_metrics
            .invalid_numeric_fields_total
            .inc_by(normalization.invalid_numeric_fields);

        self.run_metrics.sources_total.inc_by(stats.sources as u64);
        self.run_metrics
            .contributors_ranked
            .set(stats.contributors as i64);
        self.run_metrics
            .cross_file_duplicates
            .set(stats.cross_file_duplicates as i64);
        self.run_metrics
            .run_duration_seconds
            .observe(stats.duration.as_secs_f64());
    }

    /// Encode all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        TextEncoder::new()
            .encode_to_string(&metric_families)
            .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))
    }
}

impl RecordMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let records_total = IntCounterVec::new(
            Opts::new("jam_ranker_records_total", "Raw records by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(records_total.clone()))?;

        let malformed_identities_total = IntCounter::new(
            "jam_ranker_malformed_identities_total",
            "Identity fields that could not be decoded",
        )?;
        registry.register(Box::new(malformed_identities_total.clone()))?;

        let identity_pairs_total = IntCounter::new(
            "jam_ranker_identity_pairs_total",
            "Record and identity pairs emitted",
        )?;
        registry.register(Box::new(identity_pairs_total.clone()))?;

        let invalid_numeric_fields_total = IntCounter::new(
            "jam_ranker_invalid_numeric_fields_total",
            "Numeric fields treated as missing",
        )?;
        registry.register(Box::new(invalid_numeric_fields_total.clone()))?;

        Ok(Self {
            records_total,
            malformed_identities_total,
            identity_pairs_total,
            invalid_numeric_fields_total,
        })
    }
}

impl RunMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let sources_total = IntCounter::new("jam_ranker_sources_total", "Sources consumed")?;
        registry.register(Box::new(sources_total.clone()))?;

        let contributors_ranked = IntGauge::new(
            "jam_ranker_contributors_ranked",
            "Contributors in the last ranking",
        )?;
        registry.register(Box::new(contributors_ranked.clone()))?;

        let cross_file_duplicates = IntGauge::new(
            "jam_ranker_cross_file_duplicates",
            "Contributors found in more than one source",
        )?;
        registry.register(Box::new(cross_file_duplicates.clone()))?;

        let run_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "jam_ranker_run_duration_seconds",
                "End-to-end pipeline duration",
            )
            .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        )?;
        registry.register(Box::new(run_duration_seconds.clone()))?;

        Ok(Self {
            sources_total,
            contributors_ranked,
            cross_file_duplicates,
            run_duration_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::NormalizationStats;
    use std::time::Duration;

    fn sample_stats() -> RunStats {
        RunStats {
            sources: 2,
            normalization: NormalizationStats {
                records_seen: 10,
                records_accepted: 8,
                records_dropped: 2,
                malformed_identities: 1,
                identity_pairs: 11,
                invalid_numeric_fields: 3,
            },
            contributors: 9,
            cross_file_duplicates: 1,
            duration: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_metrics_collector_creation() {
        let collector = PipelineMetrics::new().expect("Failed to create metrics collector");

        let _records = collector.records();
        let _run = collector.run();
    }

    #[test]
    fn test_record_run() {
        let collector = PipelineMetrics::new().expect("Failed to create metrics collector");
        collector.record_run(&sample_stats());

        let records = collector.records();
        assert_eq!(records.records_total.with_label_values(&["seen"]).get(), 10);
        assert_eq!(records.records_total.with_label_values(&["dropped"]).get(), 2);
        assert_eq!(records.malformed_identities_total.get(), 1);
        assert_eq!(records.identity_pairs_total.get(), 11);
        assert_eq!(collector.run().contributors_ranked.get(), 9);
        assert_eq!(collector.run().run_duration_seconds.get_sample_count(), 1);
    }

    #[test]
    fn test_render_text_exposition() {
        let collector = PipelineMetrics::new().expect("Failed to create metrics collector");
        collector.record_run(&sample_stats());

        let text = collector.render().unwrap();
        assert!(text.contains("jam_ranker_records_total{outcome=\"accepted\"} 8"));
        assert!(text.contains("jam_ranker_cross_file_duplicates 1"));
    }

    #[test]
    fn test_shared_registry_collects_run_metrics() {
        let registry = Arc::new(Registry::new());
        let collector = PipelineMetrics::with_registry(registry.clone())
            .expect("Failed to create metrics collector");
        collector.record_run(&sample_stats());

        assert!(Arc::ptr_eq(&registry, &collector.registry()));
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"jam_ranker_sources_total".to_string()));
        assert!(PipelineMetrics::with_registry(registry).is_err());
    }
}
