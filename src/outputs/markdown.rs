//! Markdown rendering of a [`ReportView`].
//!
//! Rendering is pure: the same view, title and `generated_at` always give
//! byte-identical output.

use crate::aggregate::ReportView;
use crate::models::{Article, MISSING};
use crate::utils::upcase;
use chrono::NaiveDateTime;
use std::fmt::Write;

pub const NO_DATA_MESSAGE: &str = "No news data available to generate the report.";

/// Render a full report, or the minimal no-data document when the view was
/// built from zero articles.
///
/// # Output
///
/// ```text
/// # {title}
///
/// **Generated at:** 2025-10-01 12:00:00
///
/// ## Summary
///
/// - Total articles analyzed: 4
/// - Positive articles: 2 (50.00%)
/// ...
///
/// ## Detailed News
///
/// ### [{title}]({link})
/// - **Published at:** 2025-09-28 11:00
/// - **Summary:** {summary}
/// - **Sentiment:** Pos (Pos: 0.60, Neg: 0.10, Neu: 0.30)
/// ```
pub fn render(view: &ReportView, title: &str, generated_at: NaiveDateTime) -> String {
    if view.is_empty_input() {
        return render_empty(title);
    }

    let mut md = String::new();
    writeln!(md, "# {}\n", title).unwrap();
    writeln!(
        md,
        "**Generated at:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .unwrap();

    writeln!(md, "## Summary\n").unwrap();
    writeln!(md, "- Total articles analyzed: {}", view.total).unwrap();
    writeln!(md, "- Positive articles: {}", count_with_share(view, view.positive_count)).unwrap();
    writeln!(md, "- Negative articles: {}", count_with_share(view, view.negative_count)).unwrap();
    writeln!(md, "- Neutral articles: {}\n", count_with_share(view, view.neutral_count)).unwrap();

    writeln!(md, "## Detailed News\n").unwrap();
    for article in &view.articles {
        write_article(&mut md, article);
    }
    md
}

/// The document written when there was nothing to analyse.
pub fn render_empty(title: &str) -> String {
    format!("# {}\n\n{}\n", title, NO_DATA_MESSAGE)
}

/// `count (pp.pp%)`, or `count (n/a)` when the view has no articles.
fn count_with_share(view: &ReportView, count: usize) -> String {
    match view.percentage(count) {
        Some(pct) => format!("{} ({:.2}%)", count, pct),
        None => format!("{} (n/a)", count),
    }
}

fn write_article(md: &mut String, article: &Article) {
    let published = article
        .published_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string());
    let sentiment = match &article.sentiment {
        Some(s) => format!(
            "{} (Pos: {:.2}, Neg: {:.2}, Neu: {:.2})",
            upcase(&s.label),
            s.positive,
            s.negative,
            s.neutral
        ),
        None => format!("{} (Pos: 0.00, Neg: 0.00, Neu: 0.00)", MISSING),
    };

    writeln!(md, "### [{}]({})", article.title, article.link).unwrap();
    writeln!(md, "- **Published at:** {}", published).unwrap();
    writeln!(md, "- **Summary:** {}", article.summary).unwrap();
    writeln!(md, "- **Sentiment:** {}\n", sentiment).unwrap();
}
