//! Raw record normalization
//!
//! The normalizer is pure: it never fails and never aborts a batch. Problems
//! with a single record are counted in [`NormalizationStats`] and the record
//! is either repaired (missing numbers) or dropped (no usable identity).

use crate::ingest::identity::IdentityField;
use crate::types::{
    AttributedRecord, Category, CategoryGrades, CommunitySignals, GradeEntry, RawRecord,
    ResultRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Highest valid category average
pub const MAX_AVERAGE_GRADE: f64 = 5.0;

/// Highest accepted community engagement count
pub const MAX_ENGAGEMENT_COUNT: f64 = u32::MAX as f64;

/// Field names the normalizer reads from raw records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Contributor identity field (scalar or list-like)
    pub identity_field: String,
    /// Event version field
    pub event_version_field: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            identity_field: "author".to_string(),
            event_version_field: "ludum_dare_version".to_string(),
        }
    }
}

/// Counters collected while normalizing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub records_seen: u64,
    pub records_accepted: u64,
    pub records_dropped: u64,
    /// Identity fields that were present but could not be decoded
    pub malformed_identities: u64,
    /// (record, identity) pairs emitted
    pub identity_pairs: u64,
    /// Numeric fields present but unparsable or out of range, treated as missing
    pub invalid_numeric_fields: u64,
}

impl NormalizationStats {
    /// Fold another batch's counters into this one
    pub fn merge(&mut self, other: &NormalizationStats) {
        self.records_seen += other.records_seen;
        self.records_accepted += other.records_accepted;
        self.records_dropped += other.records_dropped;
        self.malformed_identities += other.malformed_identities;
        self.identity_pairs += other.identity_pairs;
        self.invalid_numeric_fields += other.invalid_numeric_fields;
    }
}

/// Normalized output of one source
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub source_tag: String,
    pub pairs: Vec<AttributedRecord>,
    pub stats: NormalizationStats,
}

/// Turns raw records into canonical result records
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    config: NormalizerConfig,
}

impl RecordNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalize every record of one source, preserving record order
    pub fn normalize_batch(&self, source_tag: &str, records: &[RawRecord]) -> NormalizedBatch {
        let mut stats = NormalizationStats::default();
        let mut pairs = Vec::with_capacity(records.len());

        for raw in records {
            pairs.extend(self.normalize_record(raw, source_tag, &mut stats));
        }

        debug!(
            "Normalized source {}: {} records, {} accepted, {} dropped, {} identity pairs",
            source_tag,
            stats.records_seen,
            stats.records_accepted,
            stats.records_dropped,
            stats.identity_pairs
        );

        NormalizedBatch {
            source_tag: source_tag.to_string(),
            pairs,
            stats,
        }
    }

    /// Normalize one record into zero or more (record, identity) pairs
    pub fn normalize_record(
        &self,
        raw: &RawRecord,
        source_tag: &str,
        stats: &mut NormalizationStats,
    ) -> Vec<AttributedRecord> {
        stats.records_seen += 1;

        let field = IdentityField::parse(raw.get(&self.config.identity_field));
        if let IdentityField::Malformed { reason } = &field {
            stats.malformed_identities += 1;
            debug!("Dropping record from {}: {}", source_tag, reason);
        }

        let identity_refs = field.into_identities();
        if identity_refs.is_empty() {
            stats.records_dropped += 1;
            return Vec::new();
        }

        let mut coercer = Coercer { stats: &mut *stats };

        let team_size = coercer
            .number(raw.get("team_size"))
            .filter(|size| *size >= 1.0)
            .map(|size| size.round() as u32)
            .unwrap_or(identity_refs.len().max(1) as u32);

        let event_version = coercer
            .number(raw.get(&self.config.event_version_field))
            .filter(|version| *version >= 0.0 && version.fract() == 0.0)
            .map(|version| version as u32);

        let mut grades = CategoryGrades::default();
        for category in Category::ALL {
            grades.set(category, coercer.grade(raw, category));
        }

        let community = CommunitySignals {
            cool: coercer.engagement(raw.get("cool")),
            feedback: coercer.engagement(raw.get("feedback")),
            given: coercer.engagement(raw.get("given")),
            smart: coercer.engagement(raw.get("smart")),
        };
        let overall_grade = coercer.number(raw.get("grade"));

        let game_link = match raw.get("game_link") {
            Some(Value::String(link)) => link.trim().to_string(),
            _ => String::new(),
        };

        let record = Arc::new(ResultRecord {
            identity_refs: identity_refs.clone(),
            source_tag: source_tag.to_string(),
            event_version,
            team_size,
            game_link,
            overall_grade,
            grades,
            community,
        });

        stats.records_accepted += 1;
        stats.identity_pairs += identity_refs.len() as u64;

        identity_refs
            .into_iter()
            .map(|identity| AttributedRecord {
                identity,
                record: Arc::clone(&record),
            })
            .collect()
    }
}

struct Coercer<'a> {
    stats: &'a mut NormalizationStats,
}

impl Coercer<'_> {
    /// Coerce a raw value to a number; unparsable values become missing
    fn number(&mut self, value: Option<&Value>) -> Option<f64> {
        let parsed = match value {
            None | Some(Value::Null) => return None,
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                    return None;
                }
                trimmed.parse::<f64>().ok()
            }
            Some(_) => None,
        };

        match parsed {
            Some(number) if number.is_finite() => Some(number),
            _ => {
                self.stats.invalid_numeric_fields += 1;
                None
            }
        }
    }

    /// Engagement counts outside `[0, MAX_ENGAGEMENT_COUNT]` become missing
    fn engagement(&mut self, value: Option<&Value>) -> Option<f64> {
        match self.number(value) {
            Some(count) if (0.0..=MAX_ENGAGEMENT_COUNT).contains(&count) => Some(count),
            Some(_) => {
                self.stats.invalid_numeric_fields += 1;
                None
            }
            None => None,
        }
    }

    fn grade(&mut self, raw: &RawRecord, category: Category) -> GradeEntry {
        let average = match self.number(raw.get(&category.average_field())) {
            Some(avg) if (0.0..=MAX_AVERAGE_GRADE).contains(&avg) => Some(avg),
            Some(_) => {
                self.stats.invalid_numeric_fields += 1;
                None
            }
            None => None,
        };

        let result = match self.number(raw.get(&category.result_field())) {
            // Tier thresholds are integers, so ceil keeps `place <= threshold` intact
            Some(place) if place >= 1.0 && place <= u32::MAX as f64 => Some(place.ceil() as u32),
            Some(_) => {
                self.stats.invalid_numeric_fields += 1;
                None
            }
            None => None,
        };

        GradeEntry { average, result }
    }
}
