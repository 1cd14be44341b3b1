//! Stack units, statuses, and batch-level predicates.
//!
//! Pure functions only. No I/O or async.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::RemovalError;

// ── Status ───────────────────────────────────────────────────────────────────

/// Removal status of a single stack as reported by the provisioning backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Skipped,
}

impl StackStatus {
    /// Every status, non-terminal first.
    pub const ALL: [StackStatus; 5] = [
        StackStatus::Pending,
        StackStatus::InProgress,
        StackStatus::Succeeded,
        StackStatus::Failed,
        StackStatus::Skipped,
    ];

    /// Parse a wire status string.
    ///
    /// `removing` and `deploying` are older backend spellings of `in_progress`.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" | "removing" | "deploying" => Some(Self::InProgress),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// A terminal status never changes again for its stack.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Skipped)
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for a terminal status.
///
/// Returns `None` for non-terminal statuses: a finished batch never contains
/// them, so a caller seeing `None` is holding a backend contract violation.
#[must_use]
pub fn format_status(status: StackStatus) -> Option<&'static str> {
    match status {
        StackStatus::Succeeded => Some("removed"),
        StackStatus::Failed => Some("failed"),
        StackStatus::Skipped => Some("not removed"),
        StackStatus::Pending | StackStatus::InProgress => None,
    }
}

// ── Stack unit ───────────────────────────────────────────────────────────────

/// One stack tracked within a removal batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackUnit {
    pub name: String,
    pub status: StackStatus,
    /// Only present when `status` is `Failed`.
    pub error_message: Option<String>,
}

impl StackUnit {
    #[must_use]
    pub fn new(name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            name: name.into(),
            status,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StackStatus::Failed,
            error_message: Some(message.into()),
        }
    }
}

/// Stack state as exchanged with the backend (camelCase JSON, loose status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStackState {
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TryFrom<WireStackState> for StackUnit {
    type Error = RemovalError;

    fn try_from(wire: WireStackState) -> Result<Self, Self::Error> {
        let Some(status) = StackStatus::from_wire(&wire.status) else {
            return Err(RemovalError::UnknownStatus {
                stack: wire.name,
                status: wire.status,
            });
        };
        let error_message = if status == StackStatus::Failed {
            wire.error_message.filter(|m| !m.is_empty())
        } else {
            None
        };
        Ok(Self {
            name: wire.name,
            status,
            error_message,
        })
    }
}

impl From<&StackUnit> for WireStackState {
    fn from(unit: &StackUnit) -> Self {
        Self {
            name: unit.name.clone(),
            status: unit.status.as_str().to_string(),
            error_message: unit.error_message.clone(),
        }
    }
}

/// Decode a full backend state list, rejecting any unrecognised status.
///
/// # Errors
///
/// Returns `RemovalError::UnknownStatus` for the first stack whose status is
/// not part of the closed set.
pub fn decode_states(wire: Vec<WireStackState>) -> Result<Vec<StackUnit>, RemovalError> {
    wire.into_iter().map(StackUnit::try_from).collect()
}

// ── Batch predicates ─────────────────────────────────────────────────────────

/// A batch is complete iff every stack in it is terminal. Empty batches are complete.
#[must_use]
pub fn is_batch_complete(states: &[StackUnit]) -> bool {
    states.iter().all(|s| s.status.is_terminal())
}

/// Outcome of folding a poll response into the previously known states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedStates {
    pub states: Vec<StackUnit>,
    /// Names of stacks the backend reported as regressing out of a terminal status.
    pub regressed: Vec<String>,
}

/// Fold a fresh poll response into the prior states.
///
/// Order follows `next`. A stack that was terminal in `prior` keeps its prior
/// state even when `next` reports it as non-terminal.
#[must_use]
pub fn merge_states(prior: Option<&[StackUnit]>, next: Vec<StackUnit>) -> MergedStates {
    let Some(prior) = prior else {
        return MergedStates {
            states: next,
            regressed: Vec::new(),
        };
    };

    let mut regressed = Vec::new();
    let states = next
        .into_iter()
        .map(|unit| {
            match prior.iter().find(|p| p.name == unit.name) {
                Some(old) if old.status.is_terminal() && !unit.status.is_terminal() => {
                    regressed.push(unit.name);
                    old.clone()
                }
                _ => unit,
            }
        })
        .collect();

    MergedStates { states, regressed }
}

// ── Selector ─────────────────────────────────────────────────────────────────

/// Which stacks a removal targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackSelector {
    All,
    Named(String),
}

impl StackSelector {
    /// Build a selector from an optional `--stack` argument.
    #[must_use]
    pub fn from_arg(stack: Option<&str>) -> Self {
        match stack {
            Some(name) if !name.is_empty() => Self::Named(name.to_string()),
            _ => Self::All,
        }
    }

    /// Value passed to the backend.
    #[must_use]
    pub fn as_backend_arg(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }

    /// Label used in progress messages.
    #[must_use]
    pub fn describe(&self) -> &str {
        match self {
            Self::All => "stacks",
            Self::Named(name) => name,
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Final per-stack outcome, in backend order.
pub type RemovalReport = Vec<StackUnit>;

/// Machine-readable report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub status: StackStatus,
}

// ── Auxiliary stack naming ───────────────────────────────────────────────────

/// Name of the system-managed debug stack for an environment.
#[must_use]
pub fn debug_stack_name(stage: &str, app_name: &str) -> String {
    format!("{stage}-{app_name}-debug-stack")
}

// ── Unit tests ───────────────────────────────────────────────────────────────
