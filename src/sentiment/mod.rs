//! Sentiment scoring and attachment.
//!
//! A [`SentimentScorer`] is any text classifier that answers with a label
//! from `{NEG, NEU, POS}` and a probability per label. This module turns
//! that answer into a [`SentimentResult`] and attaches it to articles.
//!
//! # Fallback
//!
//! Empty content is never sent to the scorer. It gets
//! [`SentimentResult::fallback`] (all zeros, label `"neutral"`). The same
//! result is used for an article whose scoring call fails, so one bad
//! article never stops the run.
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | Hosted classifier | [`huggingface`] | Text-classification model behind an inference endpoint |
//! | LLM | [`llm`] | OpenAI-compatible chat model asked for a JSON verdict |

use crate::error::Result;
use crate::models::{Article, SentimentResult};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub mod huggingface;
pub mod llm;

/// Raw answer from a scorer, in the scorer's own vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreOutput {
    /// Winning label, e.g. `"POS"`.
    pub label: String,
    /// Probability per bucket, keyed `"NEG"`, `"NEU"`, `"POS"`.
    pub probabilities: HashMap<String, f64>,
}

/// Capability to classify a piece of text.
///
/// Calls must be independent of each other: scoring the same text alone or
/// alongside others gives the same answer.
pub trait SentimentScorer {
    async fn score(&self, text: &str) -> Result<ScoreOutput>;
}

/// Map common long-form label spellings onto the `NEG`/`NEU`/`POS` buckets.
///
/// Anything unrecognised is returned upper-cased and unchanged.
pub fn canonical_bucket(label: &str) -> String {
    let upper = label.trim().to_uppercase();
    match upper.as_str() {
        "NEGATIVE" => "NEG".to_string(),
        "NEUTRAL" => "NEU".to_string(),
        "POSITIVE" => "POS".to_string(),
        _ => upper,
    }
}

impl From<ScoreOutput> for SentimentResult {
    fn from(out: ScoreOutput) -> Self {
        let bucket = |key: &str| out.probabilities.get(key).copied().unwrap_or(0.0);
        Self {
            negative: bucket("NEG"),
            neutral: bucket("NEU"),
            positive: bucket("POS"),
            label: out.label.to_lowercase(),
        }
    }
}

/// Score one text, falling back instead of failing.
pub async fn score_text<S: SentimentScorer>(scorer: &S, text: &str) -> SentimentResult {
    if text.is_empty() {
        return SentimentResult::fallback();
    }
    match scorer.score(text).await {
        Ok(out) => out.into(),
        Err(e) => {
            warn!(
                error = %e,
                text_preview = %truncate_for_log(text, 120),
                "Sentiment scoring failed; using neutral fallback"
            );
            SentimentResult::fallback()
        }
    }
}

/// Score an article's content and attach the result.
pub async fn attach<S: SentimentScorer>(scorer: &S, mut article: Article) -> Article {
    article.sentiment = Some(score_text(scorer, &article.content).await);
    article
}

/// Attach sentiment to every article, with up to `concurrency` scoring calls
/// in flight.
///
/// Output order equals input order, so ties in publication time keep the
/// order the source returned them in.
#[instrument(level = "info", skip_all, fields(count = articles.len(), concurrency = concurrency))]
pub async fn attach_all<S: SentimentScorer>(
    scorer: &S,
    articles: Vec<Article>,
    concurrency: usize,
) -> Vec<Article> {
    let t0 = Instant::now();
    let scored: Vec<Article> = stream::iter(articles)
        .map(|article| attach(scorer, article))
        .buffered(concurrency.max(1))
        .collect()
        .await;
    info!(
        count = scored.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "Sentiment analysis complete"
    );
    scored
}
