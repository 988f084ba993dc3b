//! Contributor aggregation
//!
//! The [`Aggregator`] is the one mutable map of the pipeline. It is built
//! fresh per run, fed in file-processing order, and frozen into an
//! [`AggregateSet`] before scoring starts.

use crate::types::{AttributedRecord, ContributorId, ResultRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Accumulated state for one contributor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorAggregate {
    pub identity: ContributorId,
    /// One increment per record crediting this contributor, co-authored or solo
    pub appearance_count: u32,
    /// Records in file-processing order
    pub records: Vec<Arc<ResultRecord>>,
    pub team_sizes: Vec<u32>,
    pub game_links: BTreeSet<String>,
    pub event_versions: BTreeSet<u32>,
    pub source_tags: BTreeSet<String>,
}

impl ContributorAggregate {
    /// Create an empty aggregate for a contributor
    pub fn new(identity: ContributorId) -> Self {
        Self {
            identity,
            appearance_count: 0,
            records: Vec::new(),
            team_sizes: Vec::new(),
            game_links: BTreeSet::new(),
            event_versions: BTreeSet::new(),
            source_tags: BTreeSet::new(),
        }
    }

    /// Append one record credited to this contributor
    pub fn add_record(&mut self, record: Arc<ResultRecord>) {
        self.appearance_count += 1;
        self.team_sizes.push(record.team_size);
        if !record.game_link.is_empty() {
            self.game_links.insert(record.game_link.clone());
        }
        if let Some(version) = record.event_version {
            self.event_versions.insert(version);
        }
        self.source_tags.insert(record.source_tag.clone());
        self.records.push(record);
    }

    /// Whether this contributor's records span more than one source
    pub fn spans_multiple_sources(&self) -> bool {
        self.source_tags.len() > 1
    }

    /// Mean team size across records, 0 when there are none
    pub fn average_team_size(&self) -> f64 {
        if self.team_sizes.is_empty() {
            return 0.0;
        }
        let total: u64 = self.team_sizes.iter().map(|size| u64::from(*size)).sum();
        total as f64 / self.team_sizes.len() as f64
    }
}

/// Builds contributor aggregates from attributed records
#[derive(Debug, Default)]
pub struct Aggregator {
    contributors: BTreeMap<ContributorId, ContributorAggregate>,
    pairs_seen: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one record to one contributor
    pub fn ingest(&mut self, pair: AttributedRecord) {
        let AttributedRecord { identity, record } = pair;
        debug_assert!(identity.0 != 0, "empty identities are dropped by the normalizer");

        self.contributors
            .entry(identity)
            .or_insert_with(|| ContributorAggregate::new(identity))
            .add_record(record);
        self.pairs_seen += 1;
    }

    /// Credit a stream of pairs in order
    pub fn ingest_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = AttributedRecord>,
    {
        for pair in pairs {
            self.ingest(pair);
        }
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }

    pub fn pairs_seen(&self) -> u64 {
        self.pairs_seen
    }

    /// Freeze the aggregates; nothing mutates them afterwards
    pub fn finish(self) -> AggregateSet {
        AggregateSet {
            contributors: self.contributors,
        }
    }
}

/// Immutable result of the aggregation pass, ordered by identity
#[derive(Debug, Clone, Default)]
pub struct AggregateSet {
    contributors: BTreeMap<ContributorId, ContributorAggregate>,
}

impl AggregateSet {
    pub fn get(&self, identity: &ContributorId) -> Option<&ContributorAggregate> {
        self.contributors.get(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContributorAggregate> {
        self.contributors.values()
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// Contributors whose records come from more than one source
    pub fn cross_file_duplicates(&self) -> impl Iterator<Item = &ContributorAggregate> {
        self.iter().filter(|aggregate| aggregate.spans_multiple_sources())
    }
}
