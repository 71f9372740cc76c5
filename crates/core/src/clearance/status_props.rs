//! Property-based tests for StatusEngine.

use proptest::prelude::*;

use crate::clearance::status::StatusEngine;
use crate::clearance::types::{ActionType, ClearanceStatus, StepStatus};

fn arb_step_status() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Pending),
        Just(StepStatus::Approved),
        Just(StepStatus::Rejected),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<StepStatus>> {
    prop::collection::vec(arb_step_status(), 1..12)
}

/// Every step-status combination of length `n`.
fn all_combinations(n: usize) -> Vec<Vec<StepStatus>> {
    (0..n).fold(vec![Vec::new()], |acc, _| {
        acc.into_iter()
            .flat_map(|prefix| {
                StepStatus::ALL.into_iter().map(move |s| {
                    let mut next = prefix.clone();
                    next.push(s);
                    next
                })
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// All approved yields completed, whatever the length.
    #[test]
    fn prop_all_approved_is_completed(n in 1usize..20) {
        let steps = vec![StepStatus::Approved; n];
        prop_assert_eq!(StatusEngine::recompute(&steps).unwrap(), ClearanceStatus::Completed);
    }

    /// One rejection anywhere yields rejected.
    #[test]
    fn prop_any_rejected_is_rejected(mut steps in arb_steps(), at in any::<prop::sample::Index>()) {
        let idx = at.index(steps.len());
        steps[idx] = StepStatus::Rejected;
        prop_assert_eq!(StatusEngine::recompute(&steps).unwrap(), ClearanceStatus::Rejected);
    }

    /// No rejection and at least one pending yields in progress.
    #[test]
    fn prop_open_without_rejection_is_in_progress(
        steps in prop::collection::vec(
            prop_oneof![Just(StepStatus::Pending), Just(StepStatus::Approved)],
            1..12,
        ),
        at in any::<prop::sample::Index>(),
    ) {
        let mut steps = steps;
        let idx = at.index(steps.len());
        steps[idx] = StepStatus::Pending;
        prop_assert_eq!(StatusEngine::recompute(&steps).unwrap(), ClearanceStatus::InProgress);
    }

    /// Step order never changes the result.
    #[test]
    fn prop_recompute_is_order_independent(
        (steps, shuffled) in arb_steps().prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle()))
    ) {
        prop_assert_eq!(
            StatusEngine::recompute(&steps).unwrap(),
            StatusEngine::recompute(&shuffled).unwrap()
        );
    }
}

#[test]
fn exhaustive_recompute_up_to_five_steps() {
    for n in 1..=5 {
        for steps in all_combinations(n) {
            let expected = if steps.iter().all(|s| *s == StepStatus::Approved) {
                ClearanceStatus::Completed
            } else if steps.iter().any(|s| *s == StepStatus::Rejected) {
                ClearanceStatus::Rejected
            } else {
                ClearanceStatus::InProgress
            };
            assert_eq!(StatusEngine::recompute(&steps).unwrap(), expected, "{steps:?}");
        }
    }
}

#[test]
fn exhaustive_action_type_up_to_five_steps() {
    for n in 1..=5 {
        let combos = all_combinations(n);
        assert_eq!(combos.len(), 3usize.pow(u32::try_from(n).unwrap()));

        for steps in combos {
            for status in ClearanceStatus::ALL {
                let all_rejected = steps.iter().all(|s| *s == StepStatus::Rejected);
                let expected = match status {
                    ClearanceStatus::Completed => ActionType::View,
                    ClearanceStatus::Rejected if all_rejected => ActionType::View,
                    ClearanceStatus::Approved => ActionType::Clearance,
                    ClearanceStatus::Rejected
                    | ClearanceStatus::Pending
                    | ClearanceStatus::InProgress => ActionType::Review,
                };
                assert_eq!(
                    StatusEngine::determine_action_type(status, &steps),
                    expected,
                    "{status} {steps:?}"
                );
            }
        }
    }
}
