//! Data models for fetched news and their scored representations.
//!
//! - [`RawArticle`]: one record as returned by the news source, every field optional
//! - [`Article`]: the canonical record built by [`crate::normalize`]
//! - [`SentimentResult`]: polarity scores attached by [`crate::sentiment`]
//! - [`NewsQuery`]: what to ask the news source for

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Placeholder used for any text field the source left out.
pub const MISSING: &str = "N/A";

/// A news record exactly as the source returned it.
///
/// Fields are all optional because the source is free to omit or null any of
/// them; `null` and a missing key are treated the same.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// ISO-8601 string, possibly malformed.
    pub published_at: Option<String>,
    pub snippet: Option<String>,
    pub text: Option<String>,
}

/// A canonical news article.
///
/// Created once per [`RawArticle`], gets its `sentiment` filled in exactly
/// once, and is read-only from aggregation onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub link: String,
    /// `None` when the source value was missing or unparsable.
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Snippet and full text joined by one space; this is what gets scored.
    pub content: String,
    pub sentiment: Option<SentimentResult>,
}

/// Polarity scores for one article.
///
/// The three probabilities are passed through from the scorer as-is; nothing
/// here forces them to sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    /// Lowercase: `pos`, `neg`, `neu`, or `neutral` for the fallback.
    pub label: String,
}

impl SentimentResult {
    /// Result used when there is no text to score or the scorer failed.
    pub fn fallback() -> Self {
        Self {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.0,
            label: "neutral".to_string(),
        }
    }
}

/// Search parameters for one fetch.
///
/// Both `keyword` and `symbols` may be absent, in which case the source
/// decides what "latest news" means.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsQuery {
    pub keyword: Option<String>,
    pub symbols: Vec<String>,
    pub language: String,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            symbols: Vec::new(),
            language: "pt".to_string(),
        }
    }
}
