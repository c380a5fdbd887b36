//! Fuzz target for slash_collateral and withdraw_slashed_funds
//!
//! Tests invariants:
//! - S1: penalty + returned = bond
//! - S2: The pool grows by exactly the penalty
//! - C1: Custody conservation across owner withdrawals
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz slash_collateral

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// A slash forfeits base * slash_ratio and returns the rest of the bond.
    #[test]
    fn fuzz_slash_split(input in any::<LockInput>()) {
        let params = LedgerParams {
            base_collateral: input.base_collateral,
            collateral_ratio: input.collateral_ratio,
            slash_ratio: input.slash_ratio,
        };
        let mut ledger = SimulatedLedger::with_params(OWNER, params).unwrap();
        let bond = input.base_collateral * input.collateral_ratio;
        let penalty = input.base_collateral * input.slash_ratio;
        let deposit = bond + input.deposit + 1;

        ledger.deposit(&input.account, input.account, deposit, deposit).unwrap();
        ledger.lock_collateral(&OWNER, input.account, input.task_id).unwrap();

        let receipt = ledger.slash_collateral(&OWNER, input.task_id).unwrap();
        prop_assert_eq!(receipt.penalty, penalty);
        prop_assert_eq!(receipt.returned, bond - penalty);
        prop_assert_eq!(ledger.balances(&input.account), deposit - penalty);
        prop_assert_eq!(ledger.frozen_balance(&input.account), 0);
        prop_assert_eq!(ledger.slashed_funds(), penalty);
        prop_assert_eq!(ledger.tasks(&input.task_id).outcome, LockOutcome::Slashed);
        prop_assert_eq!(check_ledger(&ledger), Ok(()));

        // Resolved locks cannot be slashed or released again
        prop_assert_eq!(ledger.slash_collateral(&OWNER, input.task_id), Err(LedgerError::TaskNotLocked));
        prop_assert_eq!(ledger.unlock_collateral(&OWNER, input.task_id), Err(LedgerError::TaskNotLocked));
    }

    /// The penalty uses the parameters in force at slash time.
    #[test]
    fn fuzz_slash_after_parameter_change(
        base in 1u64..=1_000u64,
        new_slash_ratio in 1u64..=5u64,
        new_base_divisor in 1u64..=4u64,
    ) {
        let account = actor(4);
        let task_id = TaskId::from_seed(2);
        let mut ledger = SimulatedLedger::with_params(OWNER, LedgerParams::with_base_collateral(base)).unwrap();
        ledger.deposit(&account, account, base * 10, base * 10).unwrap();
        ledger.lock_collateral(&OWNER, account, task_id).unwrap();

        let new_base = base / new_base_divisor;
        ledger.set_slash_ratio(&OWNER, new_slash_ratio).unwrap();
        ledger.set_base_collateral(&OWNER, new_base).unwrap();

        let receipt = ledger.slash_collateral(&OWNER, task_id).unwrap();
        prop_assert_eq!(receipt.penalty, new_base * new_slash_ratio);
        prop_assert_eq!(receipt.returned, base * 5 - new_base * new_slash_ratio);
    }

    /// The owner can drain the pool but never past its balance.
    #[test]
    fn fuzz_withdraw_slashed_funds(
        base in 1u64..=1_000u64,
        requests in prop::collection::vec(0u64..1_000u64, 1..8),
    ) {
        let account = actor(5);
        let mut ledger = seeded_ledger(base).unwrap();
        ledger.deposit(&account, account, base * 5, base * 5).unwrap();
        ledger.lock_collateral(&ADMINS[0], account, TaskId::from_seed(0)).unwrap();
        ledger.slash_collateral(&ADMINS[0], TaskId::from_seed(0)).unwrap();

        let mut pool = base * 2;
        let mut paid = 0;
        for amount in requests {
            let result = ledger.withdraw_slashed_funds(&OWNER, amount);
            if amount == 0 {
                prop_assert_eq!(result, Err(LedgerError::InvalidParameter));
            } else if amount > pool {
                prop_assert_eq!(result, Err(LedgerError::InsufficientFunds));
            } else {
                pool -= amount;
                paid += amount;
                prop_assert_eq!(result, Ok(pool));
            }
            prop_assert_eq!(ledger.slashed_funds(), pool);
            prop_assert_eq!(check_ledger(&ledger), Ok(()));
        }
        prop_assert_eq!(ledger.paid_out(&OWNER), paid);
    }
}
