//! In-memory record source

use crate::error::Result;
use crate::sources::RecordSource;
use crate::types::RawRecord;
use async_trait::async_trait;

/// Source backed by records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    source_tag: String,
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(source_tag: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            source_tag: source_tag.into(),
            records,
        }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    fn source_tag(&self) -> &str {
        &self.source_tag
    }

    async fn load(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}
