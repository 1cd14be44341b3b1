//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Removal errors ────────────────────────────────────────────────────────────

/// Fatal errors that abort a removal run. Per-stack failures are not errors;
/// they travel in the report.
#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("Failed to build stacks")]
    Build(#[source] anyhow::Error),

    #[error("Backend request failed")]
    Backend(#[source] anyhow::Error),

    #[error("Backend reported unknown status '{status}' for stack '{stack}'")]
    UnknownStatus { stack: String, status: String },

    #[error("Removal cancelled before the batch completed")]
    Cancelled,
}

impl RemovalError {
    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Build(_) => "build_failed",
            Self::Backend(_) => "backend_failed",
            Self::UnknownStatus { .. } => "unknown_status",
            Self::Cancelled => "cancelled",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No project configuration found at {0}. Create one or set TEARDOWN_CONFIG.")]
    NotFound(String),

    #[error("Invalid {field} '{value}': must match ^[A-Za-z][A-Za-z0-9-]*$")]
    InvalidName { field: &'static str, value: String },
}
