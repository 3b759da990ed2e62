//! Mapping of raw source records into canonical [`Article`]s.
//!
//! Normalization never fails. Missing text falls back to [`MISSING`] and an
//! unreadable publication date becomes `None`; those articles are dropped
//! later by the aggregator, not here.

use crate::models::{Article, MISSING, RawArticle};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Naive layouts accepted after the offset-aware parse fails. Values without
/// an offset are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Build an [`Article`] from one raw record.
///
/// `content` is `snippet` (or `"N/A"`) plus a single space plus `text` (or
/// nothing). That exact string is what the sentiment scorer sees.
pub fn normalize(raw: RawArticle) -> Article {
    let published_at = raw.published_at.as_deref().and_then(|value| {
        let parsed = parse_published_at(value);
        if parsed.is_none() {
            debug!(%value, "Unparsable published_at; keeping article without a timestamp");
        }
        parsed
    });

    let content = format!(
        "{} {}",
        raw.snippet.as_deref().unwrap_or(MISSING),
        raw.text.as_deref().unwrap_or("")
    );

    Article {
        title: raw.title.unwrap_or_else(|| MISSING.to_string()),
        summary: raw.description.unwrap_or_else(|| MISSING.to_string()),
        link: raw.url.unwrap_or_else(|| MISSING.to_string()),
        published_at,
        content,
        sentiment: None,
    }
}

/// Parse an ISO-8601 timestamp, treating a trailing `Z` as `+00:00`.
///
/// Returns `None` for anything that doesn't parse.
pub fn parse_published_at(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(head) => format!("{head}+00:00"),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Some(dt);
    }

    let utc = FixedOffset::east_opt(0)?;
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&value, fmt) {
            return Some(naive.and_utc().with_timezone(&utc));
        }
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(snippet: Option<&str>, text: Option<&str>) -> RawArticle {
        RawArticle {
            snippet: snippet.map(str::to_string),
            text: text.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_fields_default_to_na() {
        let article = normalize(RawArticle::default());
        assert_eq!(article.title, "N/A");
        assert_eq!(article.summary, "N/A");
        assert_eq!(article.link, "N/A");
        assert!(article.published_at.is_none());
        assert!(article.sentiment.is_none());
    }

    #[test]
    fn test_fields_are_mapped() {
        let article = normalize(RawArticle {
            title: Some("Petrobras sobe".to_string()),
            description: Some("Resumo".to_string()),
            url: Some("https://example.com/p".to_string()),
            ..Default::default()
        });
        assert_eq!(article.title, "Petrobras sobe");
        assert_eq!(article.summary, "Resumo");
        assert_eq!(article.link, "https://example.com/p");
    }

    #[test]
    fn test_content_joins_snippet_and_text() {
        assert_eq!(normalize(raw(Some("A"), Some("B"))).content, "A B");
        assert_eq!(normalize(raw(Some("A"), None)).content, "A ");
        assert_eq!(normalize(raw(None, Some("B"))).content, "N/A B");
        assert_eq!(normalize(raw(None, None)).content, "N/A ");
    }

    #[test]
    fn test_parses_zulu_timestamp() {
        let expected = DateTime::parse_from_rfc3339("2025-09-30T10:00:00+00:00").unwrap();
        assert_eq!(parse_published_at("2025-09-30T10:00:00Z"), Some(expected));
        assert_eq!(
            parse_published_at("2025-09-30T10:00:00.000000Z"),
            Some(expected)
        );
    }

    #[test]
    fn test_keeps_explicit_offset() {
        let dt = parse_published_at("2025-09-30T07:00:00-03:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -3 * 3600);
        assert_eq!(
            dt,
            DateTime::parse_from_rfc3339("2025-09-30T10:00:00+00:00").unwrap()
        );
    }

    #[test]
    fn test_naive_timestamp_reads_as_utc() {
        let expected = DateTime::parse_from_rfc3339("2025-09-30T10:00:00+00:00").unwrap();
        assert_eq!(parse_published_at("2025-09-30T10:00:00"), Some(expected));
        assert_eq!(parse_published_at("2025-09-30 10:00:00"), Some(expected));
        assert_eq!(
            parse_published_at("2025-09-30"),
            DateTime::parse_from_rfc3339("2025-09-30T00:00:00+00:00").ok()
        );
    }

    #[test]
    fn test_unparsable_date_becomes_none() {
        assert_eq!(parse_published_at("not-a-date"), None);
        assert_eq!(parse_published_at(""), None);

        let article = normalize(RawArticle {
            published_at: Some("not-a-date".to_string()),
            ..Default::default()
        });
        assert!(article.published_at.is_none());
        assert_eq!(article.title, "N/A");
    }
}
