//! Application service: batch stack removal.
//!
//! Builds the application once, then polls the backend until every stack in
//! the batch is terminal. Polls are strictly sequential with a fixed delay
//! between incomplete responses.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{ArtifactBuilder, BatchDestroyer, PollDelay, ProgressReporter};
use crate::domain::error::RemovalError;
use crate::domain::stack::{self, RemovalReport, StackSelector, StackUnit};

/// Fixed delay between two polls of an incomplete batch.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Progress line emitted once per incomplete poll.
pub const CHECKING_STATUS_MESSAGE: &str = "Checking remove status...";

/// Where a removal run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPhase {
    /// No backend call made yet.
    NotStarted,
    /// Destroy request issued by the first poll, no response processed yet.
    Requested,
    /// At least one incomplete response seen.
    Polling,
    /// Every stack is terminal.
    Complete,
}

impl RemovalPhase {
    /// Phase after a poll response has been folded in.
    #[must_use]
    pub fn after_response(self, complete: bool) -> Self {
        match (self, complete) {
            (_, true) => Self::Complete,
            (Self::NotStarted | Self::Requested | Self::Polling, false) => Self::Polling,
            (Self::Complete, false) => Self::Complete,
        }
    }

    /// Whether the next backend call carries prior states.
    #[must_use]
    pub fn has_prior_states(self) -> bool {
        matches!(self, Self::Polling)
    }
}

/// Remove the selected stacks and wait until the batch is terminal.
///
/// Per-stack failures are part of the returned report, not errors.
///
/// Completion is derived from the stack statuses, not from the backend's
/// `isCompleted` flag. A backend that claims completion while a stack is
/// still `pending` or `in_progress` keeps the loop polling; only
/// cancellation bounds such a run.
///
/// # Errors
///
/// - `RemovalError::Build` if the build step fails (no destroy is attempted).
/// - `RemovalError::Backend` if a poll call fails. There is no retry.
/// - `RemovalError::UnknownStatus` if the backend reports a status outside the closed set.
/// - `RemovalError::Cancelled` if `cancel` fires before the batch completes.
pub async fn remove_stacks(
    backend: &(impl ArtifactBuilder + BatchDestroyer),
    delay: &impl PollDelay,
    reporter: &impl ProgressReporter,
    selector: &StackSelector,
    cancel: &CancellationToken,
) -> Result<RemovalReport, RemovalError> {
    reporter.step(&format!("Removing {}", selector.describe()));

    let artifacts = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(RemovalError::Cancelled),
        built = backend.build_artifacts() => built.map_err(RemovalError::Build)?,
    };
    tracing::debug!(artifacts = %artifacts.display(), "build complete");

    let mut phase = RemovalPhase::NotStarted;
    let mut prior: Option<Vec<StackUnit>> = None;
    let mut poll_count: u32 = 0;

    loop {
        if phase == RemovalPhase::NotStarted {
            phase = transition(phase, RemovalPhase::Requested);
        }
        poll_count += 1;
        let known = if phase.has_prior_states() {
            prior.as_deref()
        } else {
            None
        };

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RemovalError::Cancelled),
            polled = backend.poll_batch_status(selector, &artifacts, known) => {
                polled.map_err(RemovalError::Backend)?
            }
        };

        let decoded = stack::decode_states(response.states)?;
        let merged = stack::merge_states(known, decoded);
        for name in &merged.regressed {
            tracing::warn!(stack = %name, "backend reported a finished stack as in progress; keeping final status");
        }

        let complete = stack::is_batch_complete(&merged.states);
        if complete != response.is_complete {
            tracing::warn!(
                backend = response.is_complete,
                derived = complete,
                "backend completion flag disagrees with stack statuses"
            );
        }
        tracing::debug!(poll = poll_count, stacks = merged.states.len(), complete, "poll processed");

        phase = transition(phase, phase.after_response(complete));
        if phase == RemovalPhase::Complete {
            return Ok(merged.states);
        }
        prior = Some(merged.states);

        reporter.step(CHECKING_STATUS_MESSAGE);
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RemovalError::Cancelled),
            () = delay.wait(POLL_INTERVAL) => {}
        }
    }
}

fn transition(from: RemovalPhase, to: RemovalPhase) -> RemovalPhase {
    if from != to {
        tracing::debug!(?from, ?to, "removal phase");
    }
    to
}
