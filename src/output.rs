//! Output writers
//!
//! Persistence of run results. Rankings and the duplicate report are written
//! as JSON, the scoring legend and metrics as plain text.

use crate::aggregate::DuplicateReport;
use crate::error::{RankingError, Result};
use crate::ranking::RankedContributor;
use crate::scoring::ScoringLegend;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Serialize any output value to JSON text
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| RankingError::InternalError {
        message: format!("failed to serialize output: {}", e),
    })?;
    Ok(text)
}

async fn write_text(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RankingError::OutputFailed {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| RankingError::OutputFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(())
}

/// Write the ranked contributors in rank order
pub async fn write_rankings(
    path: &Path,
    rankings: &[RankedContributor],
    pretty: bool,
) -> Result<()> {
    write_text(path, to_json(rankings, pretty)?).await?;
    info!("Wrote {} ranked contributors to {}", rankings.len(), path.display());
    Ok(())
}

/// Write the cross-file duplicate report
pub async fn write_duplicates(path: &Path, report: &DuplicateReport, pretty: bool) -> Result<()> {
    write_text(path, to_json(report, pretty)?).await?;
    info!(
        "Wrote {} duplicate contributors ({} records) to {}",
        report.len(),
        report.record_count(),
        path.display()
    );
    Ok(())
}

/// Write the scoring legend as text
pub async fn write_legend(path: &Path, legend: &ScoringLegend) -> Result<()> {
    write_text(path, legend.render_text()).await?;
    info!("Wrote scoring legend to {}", path.display());
    Ok(())
}

/// Write Prometheus text exposition
pub async fn write_metrics(path: &Path, exposition: String) -> Result<()> {
    write_text(path, exposition).await?;
    info!("Wrote run metrics to {}", path.display());
    Ok(())
}
