//! Ledger invariant checking for fuzz testing
//!
//! Custody invariants (C1-C3), task lock invariants (L1-L3), slash
//! accounting (S1-S2) and parameter bounds (P1).

use std::collections::HashMap;

use crate::ledger::{LockOutcome, SimulatedLedger, SlashReceipt, TaskLockRecord, TaskLockStatus};
use crate::store::{AccountId, BalanceRecord};

/// Custody invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustodyInvariantResult {
    Valid,
    /// C1: lamports in custody differ from the sum of balances and pool
    ConservationViolation { custody: u128, accounted: u128 },
    /// C2: frozen balance differs from the sum of live bonds
    FrozenMismatch { account: AccountId, frozen: u64, locked: u64 },
    /// C3: an account holds more or less than its recorded net flow
    NetFlowMismatch { account: AccountId, expected: u128, actual: u128 },
}

/// Task lock invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockInvariantResult {
    Valid,
    /// L1: status moved along an edge the lifecycle does not allow
    InvalidStateTransition { from: u8, to: u8 },
    /// L2: a resolved lock was modified
    TerminalStateModified,
    /// L3: status and outcome disagree
    OutcomeMismatch { status: u8, outcome: LockOutcome },
}

/// Slash accounting invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashInvariantResult {
    Valid,
    /// S1: penalty plus returned amount differs from the bond
    SplitMismatch { collateral: u64, penalty: u64, returned: u64 },
    /// S2: the pool did not grow by exactly the penalty
    PoolMismatch { before: u64, after: u64, penalty: u64 },
}

/// Parameter invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsInvariantResult {
    Valid,
    /// P1: ratios out of bounds
    RatioOutOfBounds { collateral_ratio: u64, slash_ratio: u64 },
}

// ============================================================================
// Custody Invariants (C1-C3)
// ============================================================================

/// C1: Custody Conservation
/// Lamports held = sum of (available + frozen) over accounts + slashed_funds.
pub fn check_custody_conservation<'a>(
    custody: u64,
    balances: impl IntoIterator<Item = &'a BalanceRecord>,
    slashed_funds: u64,
) -> CustodyInvariantResult {
    let accounted = balances
        .into_iter()
        .map(|b| b.available as u128 + b.frozen as u128)
        .sum::<u128>()
        + slashed_funds as u128;
    if accounted != custody as u128 {
        CustodyInvariantResult::ConservationViolation {
            custody: custody as u128,
            accounted,
        }
    } else {
        CustodyInvariantResult::Valid
    }
}

/// C2: Frozen Equals Live Bonds
/// An account's frozen balance is the sum of collateral of its `Locked` tasks.
pub fn check_frozen_matches_locks(ledger: &SimulatedLedger) -> CustodyInvariantResult {
    let mut locked: HashMap<AccountId, u64> = HashMap::new();
    for (_, record) in ledger.task_locks() {
        if record.status == TaskLockStatus::Locked {
            let entry = locked.entry(record.account).or_default();
            *entry = entry.saturating_add(record.collateral);
        }
    }

    for (account, balance) in ledger.account_balances() {
        let bonded = locked.remove(account).unwrap_or(0);
        if balance.frozen != bonded {
            return CustodyInvariantResult::FrozenMismatch {
                account: *account,
                frozen: balance.frozen,
                locked: bonded,
            };
        }
    }

    // Live bonds on accounts without a balance record
    if let Some((account, bonded)) = locked.into_iter().find(|(_, amount)| *amount > 0) {
        return CustodyInvariantResult::FrozenMismatch {
            account,
            frozen: 0,
            locked: bonded,
        };
    }

    CustodyInvariantResult::Valid
}

/// C3: Net Flow
/// deposited - withdrawn - slashed = available + frozen for every account.
pub fn check_net_flow(
    account: AccountId,
    deposited: u128,
    withdrawn: u128,
    slashed: u128,
    balance: &BalanceRecord,
) -> CustodyInvariantResult {
    let actual = balance.available as u128 + balance.frozen as u128;
    let expected = deposited.saturating_sub(withdrawn).saturating_sub(slashed);
    if deposited < withdrawn.saturating_add(slashed) || expected != actual {
        CustodyInvariantResult::NetFlowMismatch {
            account,
            expected,
            actual,
        }
    } else {
        CustodyInvariantResult::Valid
    }
}

// ============================================================================
// Task Lock Invariants (L1-L3)
// ============================================================================

/// L1 + L2: a lock only moves None -> Locked -> Resolved, and a resolved
/// record never changes again.
pub fn check_lock_transition(old: &TaskLockRecord, new: &TaskLockRecord) -> LockInvariantResult {
    if old == new {
        return LockInvariantResult::Valid;
    }
    if old.status == TaskLockStatus::Resolved {
        return LockInvariantResult::TerminalStateModified;
    }
    if !old.status.can_transition_to(new.status) {
        return LockInvariantResult::InvalidStateTransition {
            from: old.status as u8,
            to: new.status as u8,
        };
    }
    LockInvariantResult::Valid
}

/// L3: Pending exactly while Locked, Released or Slashed once Resolved.
pub fn check_lock_outcome(record: &TaskLockRecord) -> LockInvariantResult {
    let consistent = match record.status {
        TaskLockStatus::None | TaskLockStatus::Locked => record.outcome == LockOutcome::Pending,
        TaskLockStatus::Resolved => record.outcome != LockOutcome::Pending,
    };
    if consistent {
        LockInvariantResult::Valid
    } else {
        LockInvariantResult::OutcomeMismatch {
            status: record.status as u8,
            outcome: record.outcome,
        }
    }
}

// ============================================================================
// Slash Accounting (S1-S2)
// ============================================================================

/// S1: penalty + returned == collateral, with penalty bounded by the bond.
pub fn check_slash_split(collateral: u64, receipt: &SlashReceipt) -> SlashInvariantResult {
    let split = receipt.penalty.checked_add(receipt.returned);
    if split != Some(collateral) || receipt.penalty > collateral {
        SlashInvariantResult::SplitMismatch {
            collateral,
            penalty: receipt.penalty,
            returned: receipt.returned,
        }
    } else {
        SlashInvariantResult::Valid
    }
}

/// S2: the pool grows by exactly the penalty.
pub fn check_slash_pool(before: u64, after: u64, penalty: u64) -> SlashInvariantResult {
    if before.checked_add(penalty) != Some(after) {
        SlashInvariantResult::PoolMismatch {
            before,
            after,
            penalty,
        }
    } else {
        SlashInvariantResult::Valid
    }
}

// ============================================================================
// Parameter Bounds (P1)
// ============================================================================

/// P1: 0 < slash_ratio <= collateral_ratio
pub fn check_ratio_bounds(collateral_ratio: u64, slash_ratio: u64) -> ParamsInvariantResult {
    if slash_ratio == 0 || collateral_ratio == 0 || slash_ratio > collateral_ratio {
        ParamsInvariantResult::RatioOutOfBounds {
            collateral_ratio,
            slash_ratio,
        }
    } else {
        ParamsInvariantResult::Valid
    }
}

/// Runs every state-only invariant against `ledger` and describes the first
/// violation found.
pub fn check_ledger(ledger: &SimulatedLedger) -> Result<(), String> {
    if let CustodyInvariantResult::ConservationViolation { custody, accounted } =
        check_custody_conservation(
            ledger.custody(),
            ledger.account_balances().map(|(_, b)| b),
            ledger.slashed_funds(),
        )
    {
        return Err(format!(
            "C1: custody {} != balances + pool {}",
            custody, accounted
        ));
    }

    if let CustodyInvariantResult::FrozenMismatch {
        account,
        frozen,
        locked,
    } = check_frozen_matches_locks(ledger)
    {
        return Err(format!(
            "C2: {} frozen {} != live bonds {}",
            account, frozen, locked
        ));
    }

    for (task_id, record) in ledger.task_locks() {
        if let LockInvariantResult::OutcomeMismatch { status, outcome } = check_lock_outcome(record) {
            return Err(format!(
                "L3: {} status {} with outcome {:?}",
                task_id, status, outcome
            ));
        }
    }

    if let ParamsInvariantResult::RatioOutOfBounds {
        collateral_ratio,
        slash_ratio,
    } = check_ratio_bounds(ledger.collateral_ratio(), ledger.slash_ratio())
    {
        return Err(format!(
            "P1: collateral ratio {} / slash ratio {}",
            collateral_ratio, slash_ratio
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: TaskLockStatus, outcome: LockOutcome) -> TaskLockRecord {
        TaskLockRecord {
            account: AccountId::from_seed(3),
            collateral: 500,
            status,
            outcome,
        }
    }

    #[test]
    fn test_custody_conservation() {
        let balances = [
            BalanceRecord { available: 100, frozen: 50 },
            BalanceRecord { available: 10, frozen: 0 },
        ];
        assert_eq!(
            check_custody_conservation(180, &balances, 20),
            CustodyInvariantResult::Valid
        );
        assert!(matches!(
            check_custody_conservation(181, &balances, 20),
            CustodyInvariantResult::ConservationViolation { .. }
        ));
    }

    #[test]
    fn test_net_flow() {
        let account = AccountId::from_seed(3);
        let balance = BalanceRecord { available: 1_800, frozen: 0 };
        assert_eq!(
            check_net_flow(account, 2_000, 0, 200, &balance),
            CustodyInvariantResult::Valid
        );
        assert!(matches!(
            check_net_flow(account, 2_000, 100, 200, &balance),
            CustodyInvariantResult::NetFlowMismatch { .. }
        ));
        assert!(matches!(
            check_net_flow(account, 100, 200, 0, &BalanceRecord::default()),
            CustodyInvariantResult::NetFlowMismatch { .. }
        ));
    }

    #[test]
    fn test_lock_transitions() {
        let none = TaskLockRecord::default();
        let locked = record(TaskLockStatus::Locked, LockOutcome::Pending);
        let released = record(TaskLockStatus::Resolved, LockOutcome::Released);
        let slashed = record(TaskLockStatus::Resolved, LockOutcome::Slashed);

        assert_eq!(check_lock_transition(&none, &locked), LockInvariantResult::Valid);
        assert_eq!(check_lock_transition(&locked, &released), LockInvariantResult::Valid);
        assert_eq!(check_lock_transition(&released, &released), LockInvariantResult::Valid);

        assert_eq!(
            check_lock_transition(&none, &released),
            LockInvariantResult::InvalidStateTransition { from: 0, to: 2 }
        );
        assert_eq!(
            check_lock_transition(&released, &slashed),
            LockInvariantResult::TerminalStateModified
        );
        assert_eq!(
            check_lock_transition(&released, &locked),
            LockInvariantResult::TerminalStateModified
        );
    }

    #[test]
    fn test_lock_outcome() {
        assert_eq!(
            check_lock_outcome(&record(TaskLockStatus::Locked, LockOutcome::Pending)),
            LockInvariantResult::Valid
        );
        assert!(matches!(
            check_lock_outcome(&record(TaskLockStatus::Locked, LockOutcome::Slashed)),
            LockInvariantResult::OutcomeMismatch { .. }
        ));
        assert!(matches!(
            check_lock_outcome(&record(TaskLockStatus::Resolved, LockOutcome::Pending)),
            LockInvariantResult::OutcomeMismatch { .. }
        ));
    }

    #[test]
    fn test_slash_accounting() {
        let receipt = SlashReceipt {
            account: AccountId::from_seed(3),
            penalty: 200,
            returned: 300,
            balance: BalanceRecord::default(),
            slashed_funds: 200,
        };
        assert_eq!(check_slash_split(500, &receipt), SlashInvariantResult::Valid);
        assert!(matches!(
            check_slash_split(400, &receipt),
            SlashInvariantResult::SplitMismatch { .. }
        ));

        assert_eq!(check_slash_pool(0, 200, 200), SlashInvariantResult::Valid);
        assert!(matches!(
            check_slash_pool(0, 199, 200),
            SlashInvariantResult::PoolMismatch { .. }
        ));
        assert!(matches!(
            check_slash_pool(u64::MAX, 0, 1),
            SlashInvariantResult::PoolMismatch { .. }
        ));
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(check_ratio_bounds(5, 2), ParamsInvariantResult::Valid);
        assert_eq!(check_ratio_bounds(5, 5), ParamsInvariantResult::Valid);
        assert!(matches!(check_ratio_bounds(2, 5), ParamsInvariantResult::RatioOutOfBounds { .. }));
        assert!(matches!(check_ratio_bounds(5, 0), ParamsInvariantResult::RatioOutOfBounds { .. }));
    }

    #[test]
    fn test_fresh_ledger_is_consistent() {
        let ledger = SimulatedLedger::new(AccountId::from_seed(0));
        assert_eq!(check_ledger(&ledger), Ok(()));
    }
}
