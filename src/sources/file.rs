//! JSON file sources
//!
//! A snapshot file holds either a JSON array of record objects (`.json`) or
//! one record object per line (`.jsonl` / `.ndjson`). Entries that are not
//! objects are skipped; they are record-level problems, not source failures.

use crate::error::{RankingError, Result};
use crate::sources::RecordSource;
use crate::types::RawRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Layout of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// A single JSON array of objects
    Json,
    /// One JSON object per line
    JsonLines,
}

impl FileFormat {
    /// Infer the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "jsonl" | "ndjson" => Some(FileFormat::JsonLines),
            _ => None,
        }
    }
}

/// Record source reading one snapshot file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    source_tag: String,
    format: FileFormat,
}

impl JsonFileSource {
    /// Create a source for a file; the tag is the file name
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        let path = path.into();
        let source_tag = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path,
            source_tag,
            format,
        }
    }

    /// Create a source, inferring the format from the extension
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| RankingError::SourceLoadFailed {
                source_tag: path.display().to_string(),
                message: "unsupported file extension".to_string(),
            })?;

        Ok(Self::new(path, format))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn load_error(&self, message: impl Into<String>) -> RankingError {
        RankingError::SourceLoadFailed {
            source_tag: self.source_tag.clone(),
            message: message.into(),
        }
    }

    fn parse(&self, contents: &str) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        match self.format {
            FileFormat::Json => {
                let value: Value = serde_json::from_str(contents)
                    .map_err(|e| self.load_error(format!("invalid JSON: {}", e)))?;
                let Value::Array(items) = value else {
                    return Err(self.load_error("expected a JSON array of records").into());
                };

                for item in items {
                    match item {
                        Value::Object(map) => records.push(map),
                        _ => skipped += 1,
                    }
                }
            }
            FileFormat::JsonLines => {
                for (line_number, line) in contents.lines().enumerate() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Value>(line) {
                        Ok(Value::Object(map)) => records.push(map),
                        Ok(_) => skipped += 1,
                        Err(e) => {
                            debug!("{}:{}: {}", self.source_tag, line_number + 1, e);
                            skipped += 1;
                        }
                    }
                }
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} entries in {} that were not record objects",
                skipped, self.source_tag
            );
        }

        Ok(records)
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn source_tag(&self) -> &str {
        &self.source_tag
    }

    async fn load(&self) -> Result<Vec<RawRecord>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.load_error(e.to_string()))?;
        self.parse(&contents)
    }
}

/// Find snapshot files named `<prefix>*.<extension>` in a directory
///
/// Sources are returned sorted by file name so that runs are reproducible
/// regardless of directory iteration order.
pub async fn discover_sources(
    directory: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Vec<JsonFileSource>> {
    let discovery_error = |message: String| RankingError::SourceDiscoveryFailed {
        directory: directory.display().to_string(),
        message,
    };

    let format = FileFormat::from_extension(extension)
        .ok_or_else(|| discovery_error(format!("unsupported extension: {}", extension)))?;
    let suffix = format!(".{}", extension);

    let mut entries = tokio::fs::read_dir(directory)
        .await
        .map_err(|e| discovery_error(e.to_string()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| discovery_error(e.to_string()))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && name.ends_with(&suffix) {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if is_file {
                paths.push(entry.path());
            }
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(
        "Discovered {} sources in {}",
        paths.len(),
        directory.display()
    );

    Ok(paths
        .into_iter()
        .map(|path| JsonFileSource::new(path, format))
        .collect())
}
