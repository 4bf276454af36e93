//! Property-based tests for the batch workflow.

use proptest::prelude::*;
use uuid::Uuid;

use super::error::OpeningBalanceError;
use super::types::{BatchStatus, EditDecision, EditRequestStatus};
use super::workflow::{BatchState, BatchWorkflow};

fn arb_status() -> impl Strategy<Value = BatchStatus> {
    prop_oneof![
        Just(BatchStatus::Draft),
        Just(BatchStatus::Submitted),
        Just(BatchStatus::Approved),
        Just(BatchStatus::Rejected),
    ]
}

fn arb_edit_status() -> impl Strategy<Value = EditRequestStatus> {
    prop_oneof![
        Just(EditRequestStatus::None),
        Just(EditRequestStatus::Approved),
        Just(EditRequestStatus::Rejected),
        Just(EditRequestStatus::Pending),
    ]
}

fn arb_state() -> impl Strategy<Value = BatchState> {
    (1i32..10_000, arb_status(), arb_edit_status(), any::<bool>()).prop_map(
        |(batch_id, status, edit, has_journal)| BatchState {
            batch_id,
            status,
            edit_request_status: edit,
            has_journal,
        },
    )
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful status change is an edge of the state machine.
    #[test]
    fn prop_transitions_follow_state_machine(
        state in arb_state(),
        user in arb_uuid(),
        reason in arb_reason(),
    ) {
        let attempts = [
            BatchWorkflow::update(state),
            BatchWorkflow::submit(state, user),
            BatchWorkflow::approve(state, user, None),
            BatchWorkflow::reject(state, user, Some(&reason)),
            BatchWorkflow::decide_edit(state, user, EditDecision::Approve, None),
        ];
        for transition in attempts.into_iter().flatten() {
            if let Some(to) = transition.new_status() {
                prop_assert!(BatchWorkflow::is_valid_transition(state.status, to));
            }
        }
    }

    /// Approved batches can never be updated or cancelled directly.
    #[test]
    fn prop_approved_is_locked(edit in arb_edit_status(), batch_id in 1i32..10_000) {
        let state = BatchState {
            batch_id,
            status: BatchStatus::Approved,
            edit_request_status: edit,
            has_journal: true,
        };
        prop_assert!(BatchWorkflow::update(state).is_err());
        prop_assert!(BatchWorkflow::cancel(state).is_err());
    }

    /// Blank reasons are rejected before the state is examined.
    #[test]
    fn prop_blank_reason_rejected(state in arb_state(), user in arb_uuid(), blanks in " {0,5}") {
        let is_reason_error = |result: Result<_, OpeningBalanceError>| {
            matches!(result, Err(OpeningBalanceError::ReasonRequired(_)))
        };
        prop_assert!(is_reason_error(BatchWorkflow::reject(state, user, Some(&blanks))));
        prop_assert!(is_reason_error(BatchWorkflow::request_edit(state, user, Some(&blanks))));
        prop_assert!(is_reason_error(BatchWorkflow::request_edit(state, user, None)));
    }

    /// Only one edit request can be pending at a time.
    #[test]
    fn prop_single_pending_edit(batch_id in 1i32..10_000, user in arb_uuid(), reason in arb_reason()) {
        let state = BatchState {
            batch_id,
            status: BatchStatus::Approved,
            edit_request_status: EditRequestStatus::Pending,
            has_journal: true,
        };
        prop_assert!(matches!(
            BatchWorkflow::request_edit(state, user, Some(&reason)),
            Err(OpeningBalanceError::EditRequestAlreadyPending(id)) if id == batch_id
        ));
    }
}
