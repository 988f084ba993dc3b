//! Record sources
//!
//! How raw records reach the pipeline is outside the core. This module
//! defines the boundary trait and two implementations: JSON files on disk and
//! in-memory batches.

pub mod file;
pub mod memory;

pub use file::{discover_sources, FileFormat, JsonFileSource};
pub use memory::InMemorySource;

use crate::error::Result;
use crate::pipeline::SourceBatch;
use crate::types::RawRecord;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// A provider of raw result records for one dataset snapshot
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Provenance tag attached to every record of this source
    fn source_tag(&self) -> &str;

    /// Load all raw records, in source order
    async fn load(&self) -> Result<Vec<RawRecord>>;
}

/// Load several sources concurrently, keeping their order
pub async fn load_batches(
    sources: &[Arc<dyn RecordSource>],
    max_concurrent: usize,
) -> Result<Vec<SourceBatch>> {
    stream::iter(sources.iter().cloned())
        .map(|source| async move {
            let records = source.load().await?;
            debug!("Loaded {} records from {}", records.len(), source.source_tag());
            Ok::<_, anyhow::Error>(SourceBatch::new(source.source_tag(), records))
        })
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await
}
