//! News sources for fetching raw articles.
//!
//! A source is anything that can answer a [`NewsQuery`] with a list of
//! [`RawArticle`]s. Fetching is best-effort and happens once per run: a source
//! never returns an error to the pipeline. Transport failures and non-2xx
//! responses are logged and reported as an empty result.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Marketaux | [`marketaux`] | REST API | Requires an API token; keyword and/or ticker search |

use crate::models::{NewsQuery, RawArticle};

pub mod marketaux;

/// Capability to search a news provider.
pub trait NewsSource {
    /// Fetch articles matching `query`.
    ///
    /// Returns an empty vector on any failure; the cause is logged by the
    /// implementation.
    async fn fetch(&self, query: &NewsQuery) -> Vec<RawArticle>;
}
