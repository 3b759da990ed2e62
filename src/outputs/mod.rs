//! Output generation for the sentiment report.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders a `ReportView` as the human-readable markdown report
//! - [`json`]: Writes the same `ReportView` as JSON for machine consumption
//!
//! Both files are overwritten on every run.

pub mod json;
pub mod markdown;
