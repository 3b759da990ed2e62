//! JSON output of the aggregated report.
//!
//! Serializes the whole [`ReportView`] (counts plus the sorted articles with
//! their sentiment) so other tools can consume a run without parsing the
//! markdown. Timestamps keep their source offset in RFC 3339 form.

use crate::aggregate::ReportView;
use crate::error::Result;
use crate::utils::ensure_parent_dir;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `view` as pretty-printed JSON to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report_json(view: &ReportView, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(view)?;

    ensure_parent_dir(path).await?;
    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write JSON report");
        return Err(e.into());
    }
    info!(articles = view.articles.len(), "Wrote JSON report");
    Ok(())
}
