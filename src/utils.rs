//! Small helpers for label formatting, log hygiene, and output paths.

use crate::error::Result;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// A model reply cut off by a token limit fails with an EOF error rather than
/// a syntax error; callers report that case separately.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Capitalize the first character of a string.
///
/// Used for sentiment labels in the report (e.g., "pos" -> "Pos").
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("neu"), "Neu");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Make sure the directory that will hold `path` exists.
///
/// A bare filename (no parent component) is written to the working directory
/// and needs nothing created.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            info!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
