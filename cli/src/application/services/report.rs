//! Application service: turn a finished batch into report lines and the
//! machine-readable payload.

use crate::domain::stack::{ReportEntry, StackStatus, StackUnit, format_status};

/// Summary of a finished removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    /// `{name, status}` per stack, in backend order.
    pub entries: Vec<ReportEntry>,
    /// True when at least one stack ended in `failed`.
    pub any_failed: bool,
}

/// Build the payload for a finished batch.
#[must_use]
pub fn summarize(report: &[StackUnit]) -> RemovalSummary {
    let entries = report
        .iter()
        .map(|unit| ReportEntry {
            name: unit.name.clone(),
            status: unit.status,
        })
        .collect();
    let any_failed = report.iter().any(|u| u.status == StackStatus::Failed);
    RemovalSummary {
        entries,
        any_failed,
    }
}

/// Status label for the human report.
///
/// Non-terminal statuses cannot appear in a finished batch; if one does, it
/// is flagged rather than rendered blank.
#[must_use]
pub fn status_label(status: StackStatus) -> String {
    format_status(status).map_or_else(
        || {
            tracing::warn!(%status, "non-terminal status in a finished removal");
            format!("unexpected ({status})")
        },
        String::from,
    )
}

/// Lines of the human block for one stack.
#[must_use]
pub fn stack_block(unit: &StackUnit) -> Vec<String> {
    let mut lines = vec![
        format!("Stack {}", unit.name),
        format!("  Status: {}", status_label(unit.status)),
    ];
    if let Some(message) = &unit.error_message {
        lines.push(format!("  Error: {message}"));
    }
    lines
}
