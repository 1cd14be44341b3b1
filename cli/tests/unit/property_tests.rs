//! Property-based tests for batch completion and status monotonicity.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use teardown_cli::domain::stack::{
    StackStatus, StackUnit, format_status, is_batch_complete, merge_states,
};

fn any_status() -> impl Strategy<Value = StackStatus> {
    prop::sample::select(StackStatus::ALL.to_vec())
}

fn batch(max: usize) -> impl Strategy<Value = Vec<StackUnit>> {
    prop::collection::vec(any_status(), 0..max).prop_map(|statuses| {
        statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| StackUnit::new(format!("stack-{i}"), status))
            .collect()
    })
}

proptest! {
    /// Completion holds exactly when every stack is terminal.
    #[test]
    fn prop_complete_iff_all_terminal(states in batch(12)) {
        let expected = states.iter().all(|s| matches!(
            s.status,
            StackStatus::Succeeded | StackStatus::Failed | StackStatus::Skipped
        ));
        prop_assert_eq!(is_batch_complete(&states), expected);
    }

    /// A stack terminal in the prior poll is still terminal, with the same
    /// status, after merging any later response.
    #[test]
    fn prop_merge_never_regresses_terminal_status(
        prior in batch(8),
        next_statuses in prop::collection::vec(any_status(), 8),
    ) {
        let next: Vec<StackUnit> = prior
            .iter()
            .zip(next_statuses)
            .map(|(p, status)| StackUnit::new(p.name.clone(), status))
            .collect();
        let merged = merge_states(Some(&prior), next);

        for old in prior.iter().filter(|p| p.status.is_terminal()) {
            let now = merged
                .states
                .iter()
                .find(|s| s.name == old.name)
                .expect("stack still present");
            prop_assert_eq!(now.status, old.status);
        }
    }

    /// Terminal statuses always render a non-empty label; others never do.
    #[test]
    fn prop_format_status_labels_only_terminal(status in any_status()) {
        match format_status(status) {
            Some(label) => {
                prop_assert!(status.is_terminal());
                prop_assert!(!label.is_empty());
            }
            None => prop_assert!(!status.is_terminal()),
        }
    }
}
