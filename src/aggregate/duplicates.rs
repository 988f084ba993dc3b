//! Cross-file duplicate identity report
//!
//! A contributor found in several independently fetched snapshots may be the
//! same person or an identity collision. The report only surfaces them for
//! review; ranking never deduplicates them away.

use crate::aggregate::aggregator::AggregateSet;
use crate::types::{ContributorId, ResultRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One contributor seen in more than one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub identity: ContributorId,
    pub source_tags: Vec<String>,
    pub event_versions: Vec<u32>,
    pub records: Vec<Arc<ResultRecord>>,
}

/// All cross-file duplicates of a run, ordered by identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub entries: Vec<DuplicateEntry>,
}

impl DuplicateReport {
    /// Extract every contributor whose records span several sources
    pub fn from_aggregates(aggregates: &AggregateSet) -> Self {
        let entries = aggregates
            .cross_file_duplicates()
            .map(|aggregate| DuplicateEntry {
                identity: aggregate.identity,
                source_tags: aggregate.source_tags.iter().cloned().collect(),
                event_versions: aggregate.event_versions.iter().copied().collect(),
                records: aggregate.records.clone(),
            })
            .collect();

        Self { entries }
    }

    pub fn identities(&self) -> Vec<ContributorId> {
        self.entries.iter().map(|entry| entry.identity).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total records carried by the report
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.records.len()).sum()
    }
}
