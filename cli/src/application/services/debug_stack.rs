//! Application service: best-effort removal of the debug stack.
//!
//! The debug stack is a support stack owned by the tool, not by the user's
//! app. Its removal never aborts the main removal; failures are surfaced as
//! a warning only. A cancelled run leaves it in place.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ExecutionContext, ProgressReporter, StackDestroyRequest, StackDestroyer,
};
use crate::domain::stack::debug_stack_name;

/// Environment the debug stack belongs to.
pub struct DebugStackTarget<'a> {
    pub stage: &'a str,
    pub app_name: &'a str,
    pub region: &'a str,
    /// Root of the debug stack app; its artifacts go to `cdk.out` below it.
    pub app_dir: &'a Path,
}

/// Result of the debug stack removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugStackOutcome {
    Removed { name: String },
    Failed { name: String, reason: String },
    /// The run was cancelled before the backend finished.
    Skipped { name: String },
}

impl DebugStackOutcome {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Removed { name } | Self::Failed { name, .. } | Self::Skipped { name } => name,
        }
    }
}

/// Remove the debug stack for `target`. Never fails.
///
/// Cancelling `cancel` drops the in-flight backend call and yields
/// `DebugStackOutcome::Skipped`.
pub async fn remove_debug_stack(
    backend: &impl StackDestroyer,
    reporter: &impl ProgressReporter,
    target: &DebugStackTarget<'_>,
    cancel: &CancellationToken,
) -> DebugStackOutcome {
    let name = debug_stack_name(target.stage, target.app_name);
    reporter.step(&format!("Removing {name} stack"));

    let context = ExecutionContext::rooted_at(target.app_dir);
    let request = StackDestroyRequest {
        stack_name: &name,
        stage: target.stage,
        region: target.region,
    };

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = backend.destroy_stack(&request, &context) => Some(result),
    };
    let Some(result) = result else {
        tracing::warn!(stack = %name, "debug stack removal cancelled");
        reporter.warn(&format!("Skipped {name}: removal cancelled"));
        return DebugStackOutcome::Skipped { name };
    };

    match result {
        Ok(()) => {
            tracing::debug!(stack = %name, "debug stack removed");
            reporter.success(&format!("Removed {name}"));
            DebugStackOutcome::Removed { name }
        }
        Err(e) => {
            let reason = format!("{e:#}");
            tracing::warn!(stack = %name, error = %reason, "debug stack removal failed");
            reporter.warn(&format!("Could not remove {name}: {reason}"));
            DebugStackOutcome::Failed { name, reason }
        }
    }
}
