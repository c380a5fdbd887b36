//! Fuzz target for concurrent callers sharing one ledger
//!
//! Tests invariants:
//! - W1: Concurrent withdrawals never pay out more than was available
//! - W2: The ledger records exactly the withdrawals that succeeded
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz concurrency

use crate::*;
use proptest::prelude::*;
use std::thread;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn fuzz_concurrent_withdrawals(
        deposit in 1u64..10_000u64,
        requests in prop::collection::vec(1u64..5_000u64, 2..12),
    ) {
        let account = actor(4);
        let mut ledger = SimulatedLedger::new(OWNER);
        ledger.deposit(&account, account, deposit, deposit).unwrap();

        let (ledger, results) = simulate_concurrent_withdrawals(ledger, account, &requests);
        if let Some(violation) = results.iter().find(|r| r.is_invariant_violation()) {
            prop_assert!(false, "{:?}", violation);
        }
        prop_assert!(ledger.paid_out(&account) <= deposit);
        prop_assert_eq!(ledger.paid_out(&account) + ledger.balances(&account), deposit);
    }
}

/// Admins race to resolve the same task: exactly one wins and the bond is
/// settled once.
#[test]
fn test_concurrent_resolution_settles_once() {
    let account = actor(5);
    let task_id = TaskId::from_seed(1);
    let mut ledger = seeded_ledger(100).unwrap();
    ledger.deposit(&account, account, 1_000, 1_000).unwrap();
    ledger.lock_collateral(&OWNER, account, task_id).unwrap();
    let shared = SharedLedger::new(ledger);

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                let admin = ADMINS[i % 2];
                scope.spawn(move || {
                    if i % 2 == 0 {
                        shared.with(|l| l.unlock_collateral(&admin, task_id).is_ok())
                    } else {
                        shared.with(|l| l.slash_collateral(&admin, task_id).is_ok())
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
    let ledger = shared.snapshot();
    assert_eq!(ledger.frozen_balance(&account), 0);
    assert_eq!(ledger.tasks(&task_id).status, TaskLockStatus::Resolved);
    assert_eq!(check_ledger(&ledger), Ok(()));
    match ledger.tasks(&task_id).outcome {
        LockOutcome::Released => assert_eq!(ledger.balances(&account), 1_000),
        LockOutcome::Slashed => assert_eq!(ledger.balances(&account), 800),
        LockOutcome::Pending => panic!("task left pending"),
    }
}

/// Deposits from many threads all land.
#[test]
fn test_concurrent_deposits() {
    let account = actor(3);
    let shared = SharedLedger::new(SimulatedLedger::new(OWNER));

    thread::scope(|scope| {
        for depositor in 0..ACTOR_COUNT {
            let shared = shared.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    shared
                        .with(|l| l.deposit(&actor(depositor), account, 10, 10))
                        .unwrap();
                }
            });
        }
    });

    let ledger = shared.snapshot();
    assert_eq!(ledger.balances(&account), 10 * 50 * ACTOR_COUNT as u64);
    assert_eq!(ledger.custody(), ledger.balances(&account));
}
