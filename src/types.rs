//! Common types used throughout the ranking pipeline

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One raw result record as delivered by a source: field name to value
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Stable key identifying one contributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributorId(pub u64);

impl std::fmt::Display for ContributorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Judged category of a jam entry, keyed by its fixed grade code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Overall = 0,
    Fun = 1,
    Innovation = 2,
    Theme = 3,
    Graphics = 4,
    Audio = 5,
    Humor = 6,
    Mood = 7,
}

impl Category {
    pub const COUNT: usize = 8;

    /// All categories in grade-code order (`grade-01` .. `grade-08`)
    pub const ALL: [Category; Category::COUNT] = [
        Category::Overall,
        Category::Fun,
        Category::Innovation,
        Category::Theme,
        Category::Graphics,
        Category::Audio,
        Category::Humor,
        Category::Mood,
    ];

    /// Grade code used as the column prefix in raw records
    pub fn code(self) -> &'static str {
        match self {
            Category::Overall => "grade-01",
            Category::Fun => "grade-02",
            Category::Innovation => "grade-03",
            Category::Theme => "grade-04",
            Category::Graphics => "grade-05",
            Category::Audio => "grade-06",
            Category::Humor => "grade-07",
            Category::Mood => "grade-08",
        }
    }

    /// Fixed weight of this category in the performance score
    pub fn weight(self) -> f64 {
        match self {
            Category::Fun => 0.35,
            Category::Overall => 0.30,
            Category::Mood => 0.12,
            Category::Graphics => 0.10,
            Category::Innovation => 0.05,
            Category::Audio => 0.04,
            Category::Theme => 0.03,
            Category::Humor => 0.01,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.code() == code)
    }

    /// Raw field holding the 0-5 average grade
    pub fn average_field(self) -> String {
        format!("{}-average", self.code())
    }

    /// Raw field holding the placement
    pub fn result_field(self) -> String {
        format!("{}-result", self.code())
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Overall => "Overall",
            Category::Fun => "Fun",
            Category::Innovation => "Innovation",
            Category::Theme => "Theme",
            Category::Graphics => "Graphics",
            Category::Audio => "Audio",
            Category::Humor => "Humor",
            Category::Mood => "Mood",
        };
        write!(f, "{}", name)
    }
}

/// Grade and placement for one category of one record. `None` means absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub average: Option<f64>,
    pub result: Option<u32>,
}

/// Grade entries for all eight categories, absent ones explicitly `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryGrades {
    entries: [GradeEntry; Category::COUNT],
}

impl CategoryGrades {
    pub fn get(&self, category: Category) -> &GradeEntry {
        &self.entries[category.index()]
    }

    pub fn set(&mut self, category: Category, entry: GradeEntry) {
        self.entries[category.index()] = entry;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &GradeEntry)> {
        Category::ALL.into_iter().zip(self.entries.iter())
    }
}

/// Community engagement counters attached to an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunitySignals {
    pub cool: Option<f64>,
    pub feedback: Option<f64>,
    pub given: Option<f64>,
    pub smart: Option<f64>,
}

impl CommunitySignals {
    /// Values that feed the community score (`cool` and `given`)
    pub fn engagement_values(&self) -> impl Iterator<Item = f64> {
        [self.cool, self.given].into_iter().flatten()
    }
}

/// One submission's normalized result for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Contributors credited on the entry, never empty once normalized
    pub identity_refs: Vec<ContributorId>,
    /// Provenance, usually the source file name
    pub source_tag: String,
    pub event_version: Option<u32>,
    pub team_size: u32,
    pub game_link: String,
    /// The `grade` column (overall grade count reported by the platform)
    pub overall_grade: Option<f64>,
    pub grades: CategoryGrades,
    pub community: CommunitySignals,
}

/// A record attributed to one of its contributors
#[derive(Debug, Clone)]
pub struct AttributedRecord {
    pub identity: ContributorId,
    pub record: Arc<ResultRecord>,
}
