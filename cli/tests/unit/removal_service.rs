//! Tests for the `removal` application service.
//!
//! The backend, delay, and reporter are all mocks, so these tests exercise the
//! polling loop without spawning processes or sleeping.

#![allow(clippy::expect_used)]

use std::time::Duration;

use teardown_cli::application::ports::ProvisioningBackend;
use teardown_cli::application::services::removal::{
    CHECKING_STATUS_MESSAGE, POLL_INTERVAL, remove_stacks,
};
use teardown_cli::domain::{RemovalError, StackSelector, StackStatus, StackUnit};
use tokio_util::sync::CancellationToken;

use crate::mocks::{
    RecordingDelay, RecordingReporter, ScriptedBackend, StalledDelay, failed_state, poll, state,
};

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_on_first_poll_returns_report_without_sleeping() {
    let backend = ScriptedBackend::new(vec![poll(
        vec![state("prod-app-ApiStack", "succeeded")],
        true,
    )]);
    let delay = RecordingDelay::default();
    let reporter = RecordingReporter::default();

    let report = remove_stacks(
        &backend,
        &delay,
        &reporter,
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(
        report,
        vec![StackUnit::new("prod-app-ApiStack", StackStatus::Succeeded)]
    );
    assert!(delay.waits().is_empty(), "no sleep after a complete poll");
    assert_eq!(backend.poll_count(), 1);
    assert_eq!(backend.build_count(), 1);
}

#[tokio::test]
async fn incomplete_twice_then_failed_sleeps_exactly_twice() {
    let backend = ScriptedBackend::new(vec![
        poll(vec![state("A", "in_progress")], false),
        poll(vec![state("A", "in_progress")], false),
        poll(vec![failed_state("A", "ROLLBACK_FAILED")], true),
    ]);
    let delay = RecordingDelay::default();
    let reporter = RecordingReporter::default();

    let report = remove_stacks(
        &backend,
        &delay,
        &reporter,
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(report, vec![StackUnit::failed("A", "ROLLBACK_FAILED")]);
    assert_eq!(delay.waits(), vec![POLL_INTERVAL, POLL_INTERVAL]);
    assert_eq!(POLL_INTERVAL, Duration::from_millis(5000));
    assert_eq!(backend.poll_count(), 3);
    assert_eq!(backend.build_count(), 1, "build runs once, not per poll");

    let checking = reporter
        .steps()
        .iter()
        .filter(|s| s.as_str() == CHECKING_STATUS_MESSAGE)
        .count();
    assert_eq!(checking, 2, "one progress line per incomplete poll");
}

#[tokio::test]
async fn empty_batch_is_complete_after_one_poll() {
    let backend = ScriptedBackend::new(vec![poll(Vec::new(), true)]);
    let delay = RecordingDelay::default();

    let report = remove_stacks(
        &backend,
        &delay,
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert!(report.is_empty());
    assert!(delay.waits().is_empty());
    assert_eq!(backend.poll_count(), 1);
}

#[tokio::test]
async fn skipped_stack_is_terminal_without_error_message() {
    let backend = ScriptedBackend::new(vec![poll(vec![state("gone", "skipped")], true)]);

    let report = remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::Named("gone".to_string()),
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(report, vec![StackUnit::new("gone", StackStatus::Skipped)]);
    assert_eq!(report[0].error_message, None);
}

// ── Request/poll protocol ─────────────────────────────────────────────────────

#[tokio::test]
async fn first_poll_has_no_prior_states_and_later_polls_carry_them() {
    let backend = ScriptedBackend::new(vec![
        poll(vec![state("A", "pending"), state("B", "pending")], false),
        poll(vec![state("A", "succeeded"), state("B", "removing")], false),
        poll(vec![state("A", "succeeded"), state("B", "succeeded")], true),
    ]);

    remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    let calls = backend.poll_calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].prior.is_none(), "first call issues the request");
    assert_eq!(
        calls[1].prior,
        Some(vec![
            StackUnit::new("A", StackStatus::Pending),
            StackUnit::new("B", StackStatus::Pending),
        ])
    );
    assert_eq!(
        calls[2].prior,
        Some(vec![
            StackUnit::new("A", StackStatus::Succeeded),
            StackUnit::new("B", StackStatus::InProgress),
        ])
    );
    assert!(
        calls
            .iter()
            .all(|c| c.artifacts.ends_with(".build/cdk.out")),
        "every poll targets the build output"
    );
}

#[tokio::test]
async fn selector_is_passed_through_to_every_poll() {
    let backend = ScriptedBackend::new(vec![
        poll(vec![state("prod-app-Api", "in_progress")], false),
        poll(vec![state("prod-app-Api", "succeeded")], true),
    ]);
    let selector = StackSelector::Named("prod-app-Api".to_string());
    let reporter = RecordingReporter::default();

    remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &reporter,
        &selector,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert!(backend.poll_calls().iter().all(|c| c.selector == selector));
    assert_eq!(reporter.steps()[0], "Removing prod-app-Api");
}

#[tokio::test]
async fn sibling_failure_does_not_stop_polling_remaining_stacks() {
    let backend = ScriptedBackend::new(vec![
        poll(
            vec![failed_state("A", "boom"), state("B", "in_progress")],
            false,
        ),
        poll(
            vec![failed_state("A", "boom"), state("B", "succeeded")],
            true,
        ),
    ]);
    let delay = RecordingDelay::default();

    let report = remove_stacks(
        &backend,
        &delay,
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(
        report,
        vec![
            StackUnit::failed("A", "boom"),
            StackUnit::new("B", StackStatus::Succeeded),
        ]
    );
    assert_eq!(delay.waits().len(), 1);
}

// ── Monotonic status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn terminal_stack_never_regresses_in_report() {
    let backend = ScriptedBackend::new(vec![
        poll(
            vec![state("A", "succeeded"), state("B", "in_progress")],
            false,
        ),
        // Backend misreports A; the orchestrator keeps its final status.
        poll(
            vec![state("A", "in_progress"), state("B", "in_progress")],
            false,
        ),
        poll(vec![state("A", "in_progress"), state("B", "skipped")], true),
    ]);

    let report = remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(
        report,
        vec![
            StackUnit::new("A", StackStatus::Succeeded),
            StackUnit::new("B", StackStatus::Skipped),
        ]
    );
    let calls = backend.poll_calls();
    assert_eq!(
        calls[2].prior.as_ref().expect("prior")[0].status,
        StackStatus::Succeeded
    );
}

#[tokio::test]
async fn backend_complete_flag_is_not_trusted_over_statuses() {
    let backend = ScriptedBackend::new(vec![
        poll(vec![state("A", "in_progress")], true),
        poll(vec![state("A", "succeeded")], true),
    ]);
    let delay = RecordingDelay::default();

    let report = remove_stacks(
        &backend,
        &delay,
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect("removal should succeed");

    assert_eq!(report, vec![StackUnit::new("A", StackStatus::Succeeded)]);
    assert_eq!(backend.poll_count(), 2);
    assert_eq!(delay.waits().len(), 1);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn build_failure_aborts_before_any_poll() {
    let backend = ScriptedBackend::failing_build("synth failed: missing stacks/index.ts");

    let err = remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect_err("build failure must propagate");

    assert!(matches!(err, RemovalError::Build(_)), "got: {err:?}");
    assert_eq!(backend.poll_count(), 0, "no destroy attempted");
}

#[tokio::test]
async fn backend_error_mid_loop_propagates_without_retry() {
    let backend = ScriptedBackend::new(vec![
        poll(vec![state("A", "in_progress")], false),
        Err(anyhow::anyhow!("ExpiredToken: credentials expired")),
        poll(vec![state("A", "succeeded")], true),
    ]);
    let delay = RecordingDelay::default();

    let err = remove_stacks(
        &backend,
        &delay,
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect_err("backend error must propagate");

    assert!(matches!(err, RemovalError::Backend(_)), "got: {err:?}");
    assert_eq!(backend.poll_count(), 2, "no retry after the failed poll");
    assert_eq!(delay.waits().len(), 1);
}

#[tokio::test]
async fn unknown_status_is_a_typed_error() {
    let backend = ScriptedBackend::new(vec![poll(vec![state("A", "DELETE_COMPLETE")], true)]);

    let err = remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::All,
        &CancellationToken::new(),
    )
    .await
    .expect_err("unknown status must not pass through");

    assert!(
        matches!(
            err,
            RemovalError::UnknownStatus { ref stack, ref status }
                if stack == "A" && status == "DELETE_COMPLETE"
        ),
        "got: {err:?}"
    );
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn cancelled_token_stops_before_build() {
    let backend = ScriptedBackend::new(vec![poll(Vec::new(), true)]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = remove_stacks(
        &backend,
        &RecordingDelay::default(),
        &RecordingReporter::default(),
        &StackSelector::All,
        &cancel,
    )
    .await
    .expect_err("cancelled run must not report");

    assert!(matches!(err, RemovalError::Cancelled), "got: {err:?}");
    assert_eq!(backend.poll_count(), 0);
}

#[tokio::test]
async fn cancellation_interrupts_the_inter_poll_delay() {
    let backend = ScriptedBackend::new(vec![poll(vec![state("A", "in_progress")], false)]);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    let reporter = RecordingReporter::default();
    let run = remove_stacks(
        &backend,
        &StalledDelay,
        &reporter,
        &StackSelector::All,
        &cancel,
    );
    let (result, ()) = tokio::join!(run, async move {
        tokio::task::yield_now().await;
        trigger.cancel();
    });

    assert!(
        matches!(result, Err(RemovalError::Cancelled)),
        "got: {result:?}"
    );
    assert_eq!(backend.poll_count(), 1);
}

// ── Composite port ────────────────────────────────────────────────────────────

fn requires_full_backend(_: &impl ProvisioningBackend) {}

#[test]
fn one_backend_serves_build_batch_and_single_stack_ports() {
    requires_full_backend(&ScriptedBackend::new(Vec::new()));
}
