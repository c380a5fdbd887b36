//! Fuzz target for deposit and withdraw
//!
//! Tests invariants:
//! - C1: Custody conservation
//! - C3: Net flow per account
//! - A1: Failed calls leave the ledger unchanged
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz deposit_withdraw

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Deposits followed by withdrawals never break an invariant, and the
    /// account ends with exactly what went in minus what came out.
    #[test]
    fn fuzz_deposit_withdraw(input in any::<DepositWithdrawInput>()) {
        let mut ledger = SimulatedLedger::new(OWNER);
        let mut flows = FlowTracker::default();
        let mut expected: u64 = 0;

        for &amount in &input.deposits {
            let result = apply_action(&mut ledger, &mut flows, &LedgerAction::Deposit {
                caller: input.account,
                account: input.account,
                amount,
                transferred: amount,
            });
            prop_assert!(!result.is_invariant_violation(), "{:?}", result);
            if amount == 0 {
                prop_assert!(result.is_error());
            } else {
                prop_assert!(result.is_success());
                expected += amount;
            }
        }

        for &amount in &input.withdrawals {
            let result = apply_action(&mut ledger, &mut flows, &LedgerAction::Withdraw {
                caller: input.account,
                account: input.account,
                amount,
            });
            prop_assert!(!result.is_invariant_violation(), "{:?}", result);
            if amount > 0 && amount <= expected {
                prop_assert!(result.is_success());
                expected -= amount;
            } else {
                prop_assert!(result.is_error());
            }
        }

        prop_assert_eq!(ledger.balances(&input.account), expected);
        prop_assert_eq!(ledger.custody(), expected);
    }

    /// A deposit whose transferred value differs from the declared amount
    /// is rejected without effect.
    #[test]
    fn fuzz_deposit_transfer_mismatch(
        account in arb_provider(),
        amount in 1u64..1_000_000u64,
        delta in 1u64..1_000u64,
        over in any::<bool>(),
    ) {
        let mut ledger = SimulatedLedger::new(OWNER);
        let transferred = if over { amount + delta } else { amount.saturating_sub(delta) };
        let before = ledger.clone();

        prop_assert_eq!(
            ledger.deposit(&account, account, amount, transferred),
            Err(LedgerError::InvalidParameter)
        );
        prop_assert_eq!(ledger, before);
    }

    /// Nobody but the account itself can withdraw from it.
    #[test]
    fn fuzz_withdraw_other_account(
        account in arb_provider(),
        caller in arb_actor(),
        amount in 1u64..1_000u64,
    ) {
        prop_assume!(caller != account);
        let mut ledger = SimulatedLedger::new(OWNER);
        ledger.deposit(&caller, account, 1_000, 1_000).unwrap();

        prop_assert_eq!(
            ledger.withdraw(&caller, account, amount),
            Err(LedgerError::Unauthorized)
        );
        prop_assert_eq!(ledger.balances(&account), 1_000);
        prop_assert_eq!(ledger.paid_out(&caller), 0);
    }
}
