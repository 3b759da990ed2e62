//! The news-to-report pipeline.
//!
//! 1. **Fetch**: one best-effort call to the news source
//! 2. **Normalize**: raw records become canonical articles
//! 3. **Score**: sentiment is attached to every article
//! 4. **Aggregate**: undated articles dropped, the rest sorted and counted
//! 5. **Render**: markdown report written to the output file (plus optional JSON)
//!
//! A fetch that returns nothing skips steps 2–4 and writes the minimal
//! no-data report instead.

use crate::aggregate::{ReportView, aggregate};
use crate::models::NewsQuery;
use crate::normalize::normalize;
use crate::outputs::{json, markdown};
use crate::sentiment::{SentimentScorer, attach_all};
use crate::sources::NewsSource;
use crate::utils::ensure_parent_dir;
use chrono::Local;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_OUTPUT_FILENAME: &str = "sentiment_report.md";
pub const DEFAULT_TITLE: &str = "Financial News Sentiment Report";

/// Everything one run needs besides its two collaborators.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub query: NewsQuery,
    pub output_filename: PathBuf,
    pub title: String,
    /// Also dump the aggregated view as JSON here.
    pub json_output: Option<PathBuf>,
    /// Upper bound on scoring calls in flight.
    pub score_concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            query: NewsQuery::default(),
            output_filename: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            title: DEFAULT_TITLE.to_string(),
            json_output: None,
            score_concurrency: 1,
        }
    }
}

/// Fetch, score, aggregate and write one report.
///
/// Per-article problems never fail the run. The only error returned is a
/// failure to write the markdown report itself.
#[instrument(level = "info", skip_all, fields(output = %opts.output_filename.display()))]
pub async fn run<N, S>(
    source: &N,
    scorer: &S,
    opts: &RunOptions,
) -> Result<ReportView, Box<dyn Error>>
where
    N: NewsSource,
    S: SentimentScorer,
{
    let raw = source.fetch(&opts.query).await;

    let (view, report) = if raw.is_empty() {
        warn!("No news found to analyse; writing empty report");
        (aggregate(Vec::new()), markdown::render_empty(&opts.title))
    } else {
        info!(count = raw.len(), "Found news articles; starting sentiment analysis");
        let articles = raw.into_iter().map(normalize).collect();
        let scored = attach_all(scorer, articles, opts.score_concurrency).await;
        let view = aggregate(scored);
        let report = markdown::render(&view, &opts.title, Local::now().naive_local());
        (view, report)
    };

    ensure_parent_dir(&opts.output_filename).await?;
    fs::write(&opts.output_filename, report).await?;
    info!(
        path = %opts.output_filename.display(),
        articles = view.total,
        "Wrote markdown report"
    );

    if let Some(path) = &opts.json_output {
        if let Err(e) = json::write_report_json(&view, path).await {
            error!(
                path = %path.display(),
                error = %e,
                "Failed to write JSON report; markdown report is unaffected"
            );
        }
    }

    Ok(view)
}
