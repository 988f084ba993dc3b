//! Test fixtures for integration testing

#![allow(dead_code)]

use jam_ranker::pipeline::SourceBatch;
use jam_ranker::types::RawRecord;
use serde_json::{json, Value};
use std::path::Path;

/// Builder for raw result records as they appear in snapshot files
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    fields: RawRecord,
}

impl RecordBuilder {
    /// Record credited to a single contributor
    pub fn author(id: u64) -> Self {
        Self::with_author(json!(id))
    }

    /// Record credited to a team, encoded the way snapshots store it
    pub fn team(ids: &[u64]) -> Self {
        let list: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        Self::with_author(json!(format!("[{}]", list.join(", "))))
    }

    /// Record with an arbitrary identity value
    pub fn with_author(author: Value) -> Self {
        let mut fields = RawRecord::new();
        fields.insert("author".to_string(), author);
        Self { fields }
    }

    /// Average and placement for `grade-0N`
    pub fn grade(mut self, index: u8, average: f64, result: u32) -> Self {
        self.fields
            .insert(format!("grade-{:02}-average", index), json!(average));
        self.fields
            .insert(format!("grade-{:02}-result", index), json!(result));
        self
    }

    pub fn team_size(self, size: u32) -> Self {
        self.field("team_size", json!(size))
    }

    pub fn cool(self, value: f64) -> Self {
        self.field("cool", json!(value))
    }

    pub fn given(self, value: f64) -> Self {
        self.field("given", json!(value))
    }

    pub fn version(self, version: u32) -> Self {
        self.field("ludum_dare_version", json!(version))
    }

    pub fn link(self, link: &str) -> Self {
        self.field("game_link", json!(link))
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> RawRecord {
        self.fields
    }
}

/// Source batch from builders
pub fn batch(source_tag: &str, records: Vec<RecordBuilder>) -> SourceBatch {
    SourceBatch::new(
        source_tag,
        records.into_iter().map(RecordBuilder::build).collect(),
    )
}

/// Write records as a JSON array snapshot file
pub fn write_snapshot(dir: &Path, file_name: &str, records: Vec<RecordBuilder>) {
    let values: Vec<Value> = records
        .into_iter()
        .map(|record| Value::Object(record.build()))
        .collect();
    let text = serde_json::to_string_pretty(&values).expect("serialize snapshot");
    std::fs::write(dir.join(file_name), text).expect("write snapshot");
}

/// Two snapshots where contributor 7 appears in both and 9 only in the second
pub fn two_event_batches() -> Vec<SourceBatch> {
    vec![
        batch(
            "ludum_dare_games_48.json",
            vec![RecordBuilder::author(7)
                .team_size(1)
                .version(48)
                .link("/events/ludum-dare/48/seven")
                .grade(2, 4.0, 10)],
        ),
        batch(
            "ludum_dare_games_49.json",
            vec![RecordBuilder::team(&[7, 9])
                .team_size(2)
                .version(49)
                .link("/events/ludum-dare/49/team")
                .grade(2, 2.0, 60)],
        ),
    ]
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
