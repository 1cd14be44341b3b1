//! JSON output helpers.
//!
//! Provides the report payload printed by `--json` and the error-object
//! formatter used when a command fails.

use anyhow::{Context, Result};

use crate::domain::ReportEntry;

/// Format the machine-readable removal payload.
///
/// Output (pretty-printed):
/// ```json
/// [
///   { "name": "prod-app-ApiStack", "status": "succeeded" }
/// ]
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(entries: &[ReportEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("JSON serialization failed")
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice: `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
