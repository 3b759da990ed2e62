//! Aggregation of scored articles into a [`ReportView`].
//!
//! Articles without a publication time are dropped, the rest are stably
//! sorted by time, and sentiment labels are tallied into three buckets.
//!
//! # Label buckets
//!
//! Buckets match `pos`, `neg` and `neu` exactly. The fallback label
//! `neutral` matches none of them, so fallback articles count towards
//! `total` but not towards any bucket, and the three percentages can sum to
//! less than 100%.

use crate::models::Article;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

/// The sorted, summarised view a report is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    /// How many articles were handed to [`aggregate`], before filtering.
    pub received: usize,
    /// Articles with a publication time, oldest first.
    pub articles: Vec<Article>,
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl ReportView {
    /// True when nothing was handed to the aggregator at all.
    ///
    /// This is different from every article having been filtered out.
    pub fn is_empty_input(&self) -> bool {
        self.received == 0
    }

    /// Share of `count` in `total`, in percent.
    ///
    /// `None` when `total` is zero.
    pub fn percentage(&self, count: usize) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(100.0 * count as f64 / self.total as f64)
        }
    }

    /// Articles counted in `total` but in none of the three buckets.
    pub fn unbucketed_count(&self) -> usize {
        self.total - self.positive_count - self.negative_count - self.neutral_count
    }
}

/// Build a [`ReportView`] from scored articles.
pub fn aggregate(articles: Vec<Article>) -> ReportView {
    let received = articles.len();
    let sorted: Vec<Article> = articles
        .into_iter()
        .filter(|a| a.published_at.is_some())
        .sorted_by_key(|a| a.published_at)
        .collect();

    let dropped = received - sorted.len();
    if dropped > 0 {
        debug!(dropped, "Dropped articles without a publication time");
    }

    let count_label = |label: &str| {
        sorted
            .iter()
            .filter(|a| a.sentiment.as_ref().is_some_and(|s| s.label == label))
            .count()
    };
    let positive_count = count_label("pos");
    let negative_count = count_label("neg");
    let neutral_count = count_label("neu");

    let view = ReportView {
        received,
        total: sorted.len(),
        articles: sorted,
        positive_count,
        negative_count,
        neutral_count,
    };
    info!(
        received,
        total = view.total,
        positive = positive_count,
        negative = negative_count,
        neutral = neutral_count,
        unbucketed = view.unbucketed_count(),
        "Aggregated articles"
    );
    view
}
