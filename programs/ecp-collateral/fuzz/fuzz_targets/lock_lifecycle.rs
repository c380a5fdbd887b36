//! Fuzz target for lock_collateral and unlock_collateral
//!
//! Tests invariants:
//! - L1: Lock transitions only None -> Locked -> Resolved
//! - L2: Resolved locks are terminal
//! - C2: Frozen balance equals the sum of live bonds
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz lock_lifecycle

use crate::*;
use proptest::prelude::*;

fn ledger_for(input: &LockInput) -> SimulatedLedger {
    let params = LedgerParams {
        base_collateral: input.base_collateral,
        collateral_ratio: input.collateral_ratio,
        slash_ratio: input.slash_ratio,
    };
    let mut ledger = SimulatedLedger::with_params(OWNER, params).unwrap();
    for admin in ADMINS {
        ledger.add_admin(&OWNER, admin).unwrap();
    }
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Lock succeeds exactly when the account can cover the bond, and an
    /// unlock returns the bond in full.
    #[test]
    fn fuzz_lock_unlock(input in any::<LockInput>()) {
        let mut ledger = ledger_for(&input);
        let mut flows = FlowTracker::default();
        let required = input.base_collateral * input.collateral_ratio;

        if input.deposit > 0 {
            let result = apply_action(&mut ledger, &mut flows, &LedgerAction::Deposit {
                caller: input.account,
                account: input.account,
                amount: input.deposit,
                transferred: input.deposit,
            });
            prop_assert!(result.is_success(), "{:?}", result);
        }

        let result = apply_action(&mut ledger, &mut flows, &LedgerAction::Lock {
            caller: ADMINS[0],
            account: input.account,
            task_id: input.task_id,
        });
        prop_assert!(!result.is_invariant_violation(), "{:?}", result);

        if required > input.deposit {
            prop_assert!(matches!(result, SimulationResult::Error(ref e) if e == "InsufficientFunds"));
            prop_assert_eq!(ledger.tasks(&input.task_id).status, TaskLockStatus::None);
            return Ok(());
        }

        prop_assert!(result.is_success());
        prop_assert_eq!(ledger.frozen_balance(&input.account), required);
        prop_assert_eq!(ledger.balances(&input.account), input.deposit - required);

        let result = apply_action(&mut ledger, &mut flows, &LedgerAction::Unlock {
            caller: ADMINS[1],
            task_id: input.task_id,
        });
        prop_assert!(result.is_success(), "{:?}", result);
        prop_assert_eq!(ledger.balances(&input.account), input.deposit);
        prop_assert_eq!(ledger.frozen_balance(&input.account), 0);

        let record = ledger.tasks(&input.task_id);
        prop_assert_eq!(record.status, TaskLockStatus::Resolved);
        prop_assert_eq!(record.outcome, LockOutcome::Released);
    }

    /// Once locked, a task id can never be locked again, whether or not it
    /// has been resolved.
    #[test]
    fn fuzz_relock_rejected(input in any::<LockInput>(), resolve_first in any::<bool>()) {
        let mut ledger = ledger_for(&input);
        ledger.deposit(&input.account, input.account, 10_000_000, 10_000_000).unwrap();
        ledger.lock_collateral(&OWNER, input.account, input.task_id).unwrap();
        if resolve_first {
            ledger.unlock_collateral(&OWNER, input.task_id).unwrap();
        }
        let before = ledger.clone();

        prop_assert_eq!(
            ledger.lock_collateral(&ADMINS[0], input.account, input.task_id),
            Err(LedgerError::TaskAlreadyLocked)
        );
        prop_assert_eq!(ledger, before);
    }

    /// Several tasks bonded against one account keep frozen equal to the
    /// sum of their live bonds while they resolve in any order.
    #[test]
    fn fuzz_multiple_locks(
        base in 1u64..=1_000u64,
        order in Just((0..TASK_COUNT).collect::<Vec<u8>>()).prop_shuffle(),
    ) {
        let account = actor(3);
        let mut ledger = SimulatedLedger::with_params(OWNER, LedgerParams::with_base_collateral(base)).unwrap();
        ledger.deposit(&account, account, base * 5 * TASK_COUNT as u64, base * 5 * TASK_COUNT as u64).unwrap();

        for seed in 0..TASK_COUNT {
            ledger.lock_collateral(&OWNER, account, TaskId::from_seed(seed)).unwrap();
        }
        prop_assert_eq!(ledger.balances(&account), 0);
        prop_assert_eq!(check_ledger(&ledger), Ok(()));

        for (n, seed) in order.into_iter().enumerate() {
            ledger.unlock_collateral(&OWNER, TaskId::from_seed(seed)).unwrap();
            let live = TASK_COUNT as u64 - n as u64 - 1;
            prop_assert_eq!(ledger.frozen_balance(&account), live * base * 5);
            prop_assert_eq!(check_ledger(&ledger), Ok(()));
        }
    }

    /// Unlocking a task that was never locked fails without effect.
    #[test]
    fn fuzz_unlock_unknown_task(task_id in arb_task(), caller in arb_actor()) {
        let mut ledger = seeded_ledger(100).unwrap();
        let before = ledger.clone();
        let expected = if ledger.is_admin(&caller) {
            LedgerError::TaskNotLocked
        } else {
            LedgerError::Unauthorized
        };

        prop_assert_eq!(ledger.unlock_collateral(&caller, task_id), Err(expected));
        prop_assert_eq!(ledger, before);
    }
}
