//! Fuzz target for arbitrary interleavings of every ledger call
//!
//! Tests all invariants after each step of a random action sequence,
//! including that failed calls have no effect.
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz action_sequence

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_action_sequence(sequence in any::<LedgerActionSequence>()) {
        let (ledger, results) = run_sequence(&sequence);

        if let Some(violation) = results.iter().find(|r| r.is_invariant_violation()) {
            prop_assert!(false, "{:?}\nSequence: {:?}", violation, sequence);
        }
        prop_assert_eq!(results.len(), sequence.actions.len());
        prop_assert_eq!(check_ledger(&ledger), Ok(()));
        prop_assert_eq!(ledger.owner(), OWNER);
    }

    /// Two ledgers fed the same sequence end in the same state, and a
    /// ledger fed nothing is untouched by its neighbour.
    #[test]
    fn fuzz_instances_are_independent(sequence in any::<LedgerActionSequence>()) {
        let idle = seeded_ledger(sequence.base_collateral).unwrap();
        let (first, _) = run_sequence(&sequence);
        let (second, _) = run_sequence(&sequence);

        prop_assert_eq!(first, second);
        prop_assert_eq!(idle, seeded_ledger(sequence.base_collateral).unwrap());
    }
}

#[test]
fn test_slash_then_owner_withdraws_pool() {
    let provider = actor(3);
    let task_id = TaskId::from_seed(3);
    let sequence = LedgerActionSequence {
        base_collateral: 100,
        actions: vec![
            LedgerAction::Deposit { caller: provider, account: provider, amount: 1_000, transferred: 1_000 },
            LedgerAction::Lock { caller: ADMINS[0], account: provider, task_id },
            LedgerAction::Slash { caller: ADMINS[1], task_id },
            LedgerAction::WithdrawSlashed { caller: OWNER, amount: 200 },
            LedgerAction::Withdraw { caller: provider, account: provider, amount: 800 },
        ],
    };

    let (ledger, results) = run_sequence(&sequence);
    assert!(results.iter().all(|r| r.is_success()), "{:?}", results);
    assert_eq!(ledger.custody(), 0);
    assert_eq!(ledger.slashed_funds(), 0);
    assert_eq!(ledger.paid_out(&OWNER), 200);
    assert_eq!(ledger.paid_out(&provider), 800);
}
