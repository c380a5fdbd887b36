//! Fuzz target for the role registry and owner-gated configuration
//!
//! Tests invariants:
//! - A2: Owner-only and admin-only calls reject everyone else
//! - P1: 0 < slash_ratio <= collateral_ratio after any update
//!
//! Run with: cargo test --release -p ecp-collateral-fuzz access_control

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Only the owner may change roles or parameters.
    #[test]
    fn fuzz_owner_gated_calls(caller in arb_actor(), target in arb_actor(), value in arb_ratio()) {
        prop_assume!(caller != OWNER);
        let mut ledger = seeded_ledger(100).unwrap();
        let before = ledger.clone();

        prop_assert_eq!(ledger.add_admin(&caller, target), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger.remove_admin(&caller, target), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger.set_collateral_ratio(&caller, value), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger.set_slash_ratio(&caller, value), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger.set_base_collateral(&caller, value), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger.withdraw_slashed_funds(&caller, 1), Err(LedgerError::Unauthorized));
        prop_assert_eq!(ledger, before);
    }

    /// Lock, unlock and slash require the admin role, which the owner has
    /// implicitly and removed admins lose.
    #[test]
    fn fuzz_admin_gated_calls(caller in arb_actor(), task_id in arb_task(), revoke in any::<bool>()) {
        let account = actor(3);
        let mut ledger = seeded_ledger(10).unwrap();
        ledger.deposit(&account, account, 1_000, 1_000).unwrap();
        if revoke && ADMINS.contains(&caller) {
            ledger.remove_admin(&OWNER, caller).unwrap();
        }
        let allowed = caller == OWNER || (!revoke && ADMINS.contains(&caller));
        prop_assert_eq!(ledger.is_admin(&caller), allowed);

        let locked = ledger.lock_collateral(&caller, account, task_id);
        if allowed {
            prop_assert!(locked.is_ok());
            prop_assert!(ledger.slash_collateral(&caller, task_id).is_ok());
        } else {
            prop_assert_eq!(locked, Err(LedgerError::Unauthorized));
            prop_assert_eq!(ledger.frozen_balance(&account), 0);
            prop_assert_eq!(ledger.unlock_collateral(&caller, task_id), Err(LedgerError::Unauthorized));
            prop_assert_eq!(ledger.slash_collateral(&caller, task_id), Err(LedgerError::Unauthorized));
        }
    }

    /// Ratio updates keep the pair ordered and positive, and a rejected
    /// update keeps the old value.
    #[test]
    fn fuzz_ratio_updates(updates in prop::collection::vec((any::<bool>(), arb_ratio()), 1..16)) {
        let mut ledger = seeded_ledger(100).unwrap();
        for (collateral, value) in updates {
            let old = (ledger.collateral_ratio(), ledger.slash_ratio());
            let result = if collateral {
                ledger.set_collateral_ratio(&OWNER, value)
            } else {
                ledger.set_slash_ratio(&OWNER, value)
            };
            let next = if collateral { (value, old.1) } else { (old.0, value) };
            let valid = next.0 > 0
                && next.1 > 0
                && next.1 <= next.0
                && next.0.checked_mul(100).is_some();

            if valid {
                prop_assert_eq!(result, Ok(()));
                prop_assert_eq!((ledger.collateral_ratio(), ledger.slash_ratio()), next);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!((ledger.collateral_ratio(), ledger.slash_ratio()), old);
            }
            prop_assert_eq!(check_ratio_bounds(ledger.collateral_ratio(), ledger.slash_ratio()), ParamsInvariantResult::Valid);
        }
    }

    /// Adding and removing admins is idempotent; the owner and the zero id
    /// can never be assigned.
    #[test]
    fn fuzz_admin_registry(ops in prop::collection::vec((any::<bool>(), arb_actor()), 1..24)) {
        let mut ledger = SimulatedLedger::new(OWNER);
        let mut expected = std::collections::BTreeSet::new();

        for (add, target) in ops {
            let result = if add {
                ledger.add_admin(&OWNER, target)
            } else {
                ledger.remove_admin(&OWNER, target)
            };
            if target == OWNER {
                prop_assert_eq!(result, Err(LedgerError::InvalidParameter));
                continue;
            }
            let changed = if add { expected.insert(target) } else { expected.remove(&target) };
            prop_assert_eq!(result, Ok(changed));
        }

        prop_assert!(ledger.is_admin(&OWNER));
        for index in 1..ACTOR_COUNT {
            prop_assert_eq!(ledger.is_admin(&actor(index)), expected.contains(&actor(index)));
        }
        prop_assert_eq!(
            ledger.add_admin(&OWNER, AccountId::default()),
            Err(LedgerError::InvalidParameter)
        );
    }
}
