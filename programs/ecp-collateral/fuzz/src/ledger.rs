//! Escrow engine and task lock table
//!
//! [`SimulatedLedger`] is the runtime-free counterpart of the on-chain
//! program: one instance owns its balances, roles, parameters, task locks
//! and slashed-funds pool. Every operation validates all preconditions,
//! stages its writes and commits them together, so a failed call leaves the
//! ledger exactly as it was.
//!
//! [`SharedLedger`] puts one engine-wide lock around a ledger for hosts that
//! call it from several threads.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::params::LedgerParams;
use crate::roles::RoleRegistry;
use crate::store::{AccountId, BalanceRecord, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("caller is not authorized to perform this action")]
    Unauthorized,
    #[error("insufficient funds for the requested amount")]
    InsufficientFunds,
    #[error("task already has a collateral lock")]
    TaskAlreadyLocked,
    #[error("task collateral is not locked")]
    TaskNotLocked,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("ledger state is inconsistent")]
    InvalidState,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Task lock status; numeric values match the on-chain enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TaskLockStatus {
    #[default]
    None = 0,
    Locked = 1,
    Resolved = 2,
}

impl TaskLockStatus {
    pub fn can_transition_to(&self, new_status: TaskLockStatus) -> bool {
        use TaskLockStatus::*;
        matches!((self, new_status), (None, Locked) | (Locked, Resolved))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockOutcome {
    #[default]
    Pending,
    Released,
    Slashed,
}

/// Lock record for one task. Unseen tasks read as the `None` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskLockRecord {
    pub account: AccountId,
    pub collateral: u64,
    pub status: TaskLockStatus,
    pub outcome: LockOutcome,
}

/// Result of a successful slash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashReceipt {
    pub account: AccountId,
    pub penalty: u64,
    /// Part of the bond returned to `available`
    pub returned: u64,
    pub balance: BalanceRecord,
    pub slashed_funds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedLedger {
    roles: RoleRegistry,
    params: LedgerParams,
    balances: HashMap<AccountId, BalanceRecord>,
    tasks: HashMap<TaskId, TaskLockRecord>,
    slashed_funds: u64,
    /// Lamports held by the engine: deposits in, withdrawals out
    custody: u64,
    /// Lamports paid out to each caller by withdrawals
    payouts: HashMap<AccountId, u64>,
}

impl SimulatedLedger {
    pub fn new(owner: AccountId) -> Self {
        Self {
            roles: RoleRegistry::new(owner),
            params: LedgerParams::default(),
            balances: HashMap::new(),
            tasks: HashMap::new(),
            slashed_funds: 0,
            custody: 0,
            payouts: HashMap::new(),
        }
    }

    pub fn with_params(owner: AccountId, params: LedgerParams) -> Result<Self, LedgerError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::new(owner)
        })
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn owner(&self) -> AccountId {
        self.roles.owner()
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn params(&self) -> LedgerParams {
        self.params
    }

    pub fn balance(&self, account: &AccountId) -> BalanceRecord {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Available balance of `account`
    pub fn balances(&self, account: &AccountId) -> u64 {
        self.balance(account).available
    }

    pub fn frozen_balance(&self, account: &AccountId) -> u64 {
        self.balance(account).frozen
    }

    pub fn tasks(&self, task_id: &TaskId) -> TaskLockRecord {
        self.tasks.get(task_id).copied().unwrap_or_default()
    }

    pub fn collateral_ratio(&self) -> u64 {
        self.params.collateral_ratio
    }

    pub fn slash_ratio(&self) -> u64 {
        self.params.slash_ratio
    }

    pub fn get_base_collateral(&self) -> u64 {
        self.params.base_collateral
    }

    pub fn is_admin(&self, account: &AccountId) -> bool {
        self.roles.is_admin(account)
    }

    pub fn slashed_funds(&self) -> u64 {
        self.slashed_funds
    }

    pub fn custody(&self) -> u64 {
        self.custody
    }

    pub fn paid_out(&self, account: &AccountId) -> u64 {
        self.payouts.get(account).copied().unwrap_or(0)
    }

    pub fn account_balances(&self) -> impl Iterator<Item = (&AccountId, &BalanceRecord)> {
        self.balances.iter()
    }

    pub fn task_locks(&self) -> impl Iterator<Item = (&TaskId, &TaskLockRecord)> {
        self.tasks.iter()
    }

    // ------------------------------------------------------------------
    // Role registry (owner gated)
    // ------------------------------------------------------------------

    pub fn add_admin(&mut self, caller: &AccountId, admin: AccountId) -> Result<bool, LedgerError> {
        let added = self
            .roles
            .add_admin(caller, admin)
            .map_err(|e| rejected("add_admin", caller, e))?;
        debug!(%admin, added, "add_admin");
        Ok(added)
    }

    pub fn remove_admin(&mut self, caller: &AccountId, admin: AccountId) -> Result<bool, LedgerError> {
        let removed = self
            .roles
            .remove_admin(caller, admin)
            .map_err(|e| rejected("remove_admin", caller, e))?;
        debug!(%admin, removed, "remove_admin");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Configuration (owner gated)
    // ------------------------------------------------------------------

    pub fn set_collateral_ratio(&mut self, caller: &AccountId, value: u64) -> Result<(), LedgerError> {
        self.update_params(caller, "set_collateral_ratio", |p| p.set_collateral_ratio(value))
    }

    pub fn set_slash_ratio(&mut self, caller: &AccountId, value: u64) -> Result<(), LedgerError> {
        self.update_params(caller, "set_slash_ratio", |p| p.set_slash_ratio(value))
    }

    pub fn set_base_collateral(&mut self, caller: &AccountId, value: u64) -> Result<(), LedgerError> {
        self.update_params(caller, "set_base_collateral", |p| p.set_base_collateral(value))
    }

    fn update_params(
        &mut self,
        caller: &AccountId,
        op: &'static str,
        update: impl FnOnce(LedgerParams) -> Result<LedgerParams, LedgerError>,
    ) -> Result<(), LedgerError> {
        self.roles
            .require_owner(caller)
            .map_err(|e| rejected(op, caller, e))?;
        let next = update(self.params)?;
        debug!(
            op,
            base_collateral = next.base_collateral,
            collateral_ratio = next.collateral_ratio,
            slash_ratio = next.slash_ratio,
            "parameters updated"
        );
        self.params = next;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Escrow engine
    // ------------------------------------------------------------------

    /// Credits `amount` to `account`. `transferred` is the value the caller
    /// actually sent and must equal `amount`. Any caller may fund any account.
    pub fn deposit(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        amount: u64,
        transferred: u64,
    ) -> Result<BalanceRecord, LedgerError> {
        if amount == 0 || amount != transferred {
            return Err(LedgerError::InvalidParameter);
        }

        let mut balance = self.balance(&account);
        balance.credit(amount)?;
        let custody = self
            .custody
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.balances.insert(account, balance);
        self.custody = custody;
        debug!(%caller, %account, amount, available = balance.available, "deposit");
        Ok(balance)
    }

    /// Debits the caller's own available balance and pays it out.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        amount: u64,
    ) -> Result<BalanceRecord, LedgerError> {
        if *caller != account {
            return Err(rejected("withdraw", caller, LedgerError::Unauthorized));
        }
        if amount == 0 {
            return Err(LedgerError::InvalidParameter);
        }

        let mut balance = self.balance(&account);
        balance.debit(amount)?;
        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(LedgerError::InvalidState)?;
        let paid = self
            .paid_out(caller)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Ledger first, then the payout
        self.balances.insert(account, balance);
        self.custody = custody;
        self.payouts.insert(*caller, paid);
        debug!(%account, amount, available = balance.available, "withdraw");
        Ok(balance)
    }

    /// Freezes `base_collateral * collateral_ratio` of `account` for `task_id`.
    pub fn lock_collateral(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        task_id: TaskId,
    ) -> Result<TaskLockRecord, LedgerError> {
        self.roles
            .require_admin(caller)
            .map_err(|e| rejected("lock_collateral", caller, e))?;

        let current = self.tasks(&task_id);
        if !current.status.can_transition_to(TaskLockStatus::Locked) {
            return Err(LedgerError::TaskAlreadyLocked);
        }

        let required = self.params.required_collateral()?;
        let mut balance = self.balance(&account);
        balance.freeze(required)?;

        let record = TaskLockRecord {
            account,
            collateral: required,
            status: TaskLockStatus::Locked,
            outcome: LockOutcome::Pending,
        };
        self.balances.insert(account, balance);
        self.tasks.insert(task_id, record);
        debug!(%task_id, %account, collateral = required, "lock_collateral");
        Ok(record)
    }

    /// Returns the full bond of `task_id` to its account.
    pub fn unlock_collateral(
        &mut self,
        caller: &AccountId,
        task_id: TaskId,
    ) -> Result<BalanceRecord, LedgerError> {
        self.roles
            .require_admin(caller)
            .map_err(|e| rejected("unlock_collateral", caller, e))?;

        let mut record = self.locked_task(&task_id)?;
        let mut balance = self.balance(&record.account);
        balance.unfreeze(record.collateral)?;

        record.status = TaskLockStatus::Resolved;
        record.outcome = LockOutcome::Released;
        self.balances.insert(record.account, balance);
        self.tasks.insert(task_id, record);
        debug!(%task_id, account = %record.account, collateral = record.collateral, "unlock_collateral");
        Ok(balance)
    }

    /// Forfeits `base_collateral * slash_ratio` of the bond to the pool and
    /// returns the remainder to the account's available balance.
    pub fn slash_collateral(
        &mut self,
        caller: &AccountId,
        task_id: TaskId,
    ) -> Result<SlashReceipt, LedgerError> {
        self.roles
            .require_admin(caller)
            .map_err(|e| rejected("slash_collateral", caller, e))?;

        let mut record = self.locked_task(&task_id)?;
        let penalty = self.params.slash_penalty()?;
        if penalty > record.collateral {
            warn!(%task_id, penalty, collateral = record.collateral, "penalty exceeds bond");
            return Err(LedgerError::InvalidState);
        }

        let mut balance = self.balance(&record.account);
        balance.unfreeze(record.collateral)?;
        balance.debit(penalty)?;
        let slashed_funds = self
            .slashed_funds
            .checked_add(penalty)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        record.status = TaskLockStatus::Resolved;
        record.outcome = LockOutcome::Slashed;
        self.balances.insert(record.account, balance);
        self.tasks.insert(task_id, record);
        self.slashed_funds = slashed_funds;

        let receipt = SlashReceipt {
            account: record.account,
            penalty,
            returned: record.collateral - penalty,
            balance,
            slashed_funds,
        };
        debug!(%task_id, account = %record.account, penalty, returned = receipt.returned, "slash_collateral");
        Ok(receipt)
    }

    /// Pays `amount` from the slashed-funds pool to the owner.
    pub fn withdraw_slashed_funds(&mut self, caller: &AccountId, amount: u64) -> Result<u64, LedgerError> {
        self.roles
            .require_owner(caller)
            .map_err(|e| rejected("withdraw_slashed_funds", caller, e))?;
        if amount == 0 {
            return Err(LedgerError::InvalidParameter);
        }

        let remaining = self
            .slashed_funds
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(LedgerError::InvalidState)?;
        let paid = self
            .paid_out(caller)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.slashed_funds = remaining;
        self.custody = custody;
        self.payouts.insert(*caller, paid);
        debug!(amount, remaining, "withdraw_slashed_funds");
        Ok(remaining)
    }

    fn locked_task(&self, task_id: &TaskId) -> Result<TaskLockRecord, LedgerError> {
        let record = self.tasks(task_id);
        if record.status != TaskLockStatus::Locked {
            return Err(LedgerError::TaskNotLocked);
        }
        Ok(record)
    }
}

fn rejected(op: &'static str, caller: &AccountId, err: LedgerError) -> LedgerError {
    if err == LedgerError::Unauthorized {
        warn!(op, %caller, "unauthorized call rejected");
    }
    err
}

/// A ledger behind one engine-wide lock.
///
/// Every operation runs with the lock held for its whole duration, so calls
/// from different threads compose as if issued one at a time.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<SimulatedLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: SimulatedLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Runs `op` as one indivisible unit against the ledger.
    pub fn with<R>(&self, op: impl FnOnce(&mut SimulatedLedger) -> R) -> R {
        let mut guard = self.inner.lock();
        op(&mut guard)
    }

    pub fn snapshot(&self) -> SimulatedLedger {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: AccountId = AccountId::from_seed(0);
    const ADMIN: AccountId = AccountId::from_seed(1);
    const PROVIDER: AccountId = AccountId::from_seed(3);
    const OTHER: AccountId = AccountId::from_seed(4);
    const TASK: TaskId = TaskId::from_seed(1);

    const SOL: u64 = 1_000_000_000;

    fn ledger_with_admin(base_collateral: u64) -> SimulatedLedger {
        let mut ledger =
            SimulatedLedger::with_params(OWNER, LedgerParams::with_base_collateral(base_collateral))
                .unwrap();
        ledger.add_admin(&OWNER, ADMIN).unwrap();
        ledger
    }

    #[test]
    fn test_initial_state() {
        let ledger = SimulatedLedger::new(OWNER);
        assert_eq!(ledger.owner(), OWNER);
        assert_eq!(ledger.collateral_ratio(), 5);
        assert_eq!(ledger.slash_ratio(), 2);
        assert_eq!(ledger.get_base_collateral(), 0);
        assert!(ledger.is_admin(&OWNER));
        assert_eq!(ledger.balances(&PROVIDER), 0);
        assert_eq!(ledger.tasks(&TASK).status, TaskLockStatus::None);
    }

    #[test]
    fn test_deposit_rejects_mismatched_transfer() {
        let mut ledger = SimulatedLedger::new(OWNER);
        assert_eq!(
            ledger.deposit(&PROVIDER, PROVIDER, SOL, SOL - 1),
            Err(LedgerError::InvalidParameter)
        );
        assert_eq!(ledger.deposit(&PROVIDER, PROVIDER, 0, 0), Err(LedgerError::InvalidParameter));
        assert_eq!(ledger.custody(), 0);
        assert_eq!(ledger.balances(&PROVIDER), 0);
    }

    #[test]
    fn test_deposit_on_behalf_and_withdraw_by_owner_only() {
        let mut ledger = SimulatedLedger::new(OWNER);
        ledger.deposit(&OTHER, PROVIDER, 2 * SOL, 2 * SOL).unwrap();
        assert_eq!(ledger.balances(&PROVIDER), 2 * SOL);

        assert_eq!(
            ledger.withdraw(&OTHER, PROVIDER, SOL),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(ledger.withdraw(&OWNER, PROVIDER, SOL), Err(LedgerError::Unauthorized));

        let balance = ledger.withdraw(&PROVIDER, PROVIDER, SOL).unwrap();
        assert_eq!(balance.available, SOL);
        assert_eq!(ledger.paid_out(&PROVIDER), SOL);
        assert_eq!(ledger.custody(), SOL);
    }

    #[test]
    fn test_withdraw_more_than_available() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, SOL, SOL).unwrap();
        ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();

        // Frozen collateral is not withdrawable
        assert_eq!(
            ledger.withdraw(&PROVIDER, PROVIDER, SOL),
            Err(LedgerError::InsufficientFunds)
        );
        assert!(ledger.withdraw(&PROVIDER, PROVIDER, SOL / 2).is_ok());
    }

    #[test]
    fn test_lock_and_unlock() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, SOL, SOL).unwrap();

        let record = ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();
        assert_eq!(record.account, PROVIDER);
        assert_eq!(record.collateral, SOL / 2);
        assert_eq!(record.status as u8, 1);
        assert_eq!(ledger.frozen_balance(&PROVIDER), SOL / 2);

        ledger.unlock_collateral(&ADMIN, TASK).unwrap();
        let record = ledger.tasks(&TASK);
        assert_eq!(record.status as u8, 2);
        assert_eq!(record.outcome, LockOutcome::Released);
        assert_eq!(ledger.balances(&PROVIDER), SOL);
        assert_eq!(ledger.frozen_balance(&PROVIDER), 0);
    }

    #[test]
    fn test_lock_insufficient_funds_is_atomic() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, SOL / 4, SOL / 4).unwrap();
        let before = ledger.clone();

        assert_eq!(
            ledger.lock_collateral(&ADMIN, PROVIDER, TASK),
            Err(LedgerError::InsufficientFunds)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_lock_unseen_account_fails_on_funds() {
        let mut ledger = ledger_with_admin(1);
        assert_eq!(
            ledger.lock_collateral(&ADMIN, OTHER, TASK),
            Err(LedgerError::InsufficientFunds)
        );
    }

    #[test]
    fn test_zero_id_is_an_ordinary_account() {
        let zero = AccountId::default();
        let mut ledger = ledger_with_admin(SOL / 10);

        ledger.deposit(&OTHER, zero, SOL, SOL).unwrap();
        assert_eq!(ledger.balances(&zero), SOL);

        let record = ledger.lock_collateral(&ADMIN, zero, TASK).unwrap();
        assert_eq!(record.account, zero);
        assert_eq!(ledger.frozen_balance(&zero), SOL / 2);

        ledger.unlock_collateral(&ADMIN, TASK).unwrap();
        ledger.withdraw(&zero, zero, SOL).unwrap();
        assert_eq!(ledger.custody(), 0);
    }

    #[test]
    fn test_task_cannot_be_locked_twice() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, 2 * SOL, 2 * SOL).unwrap();
        ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();

        assert_eq!(
            ledger.lock_collateral(&ADMIN, PROVIDER, TASK),
            Err(LedgerError::TaskAlreadyLocked)
        );

        ledger.unlock_collateral(&ADMIN, TASK).unwrap();
        // Resolved is terminal
        assert_eq!(
            ledger.lock_collateral(&ADMIN, PROVIDER, TASK),
            Err(LedgerError::TaskAlreadyLocked)
        );
        assert_eq!(ledger.unlock_collateral(&ADMIN, TASK), Err(LedgerError::TaskNotLocked));
        assert_eq!(ledger.slash_collateral(&ADMIN, TASK), Err(LedgerError::TaskNotLocked));
    }

    #[test]
    fn test_slash_reference_scenario() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, 2 * SOL, 2 * SOL).unwrap();
        ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();
        assert_eq!(ledger.balances(&PROVIDER), 1_500_000_000);
        assert_eq!(ledger.frozen_balance(&PROVIDER), 500_000_000);

        let receipt = ledger.slash_collateral(&ADMIN, TASK).unwrap();
        assert_eq!(receipt.penalty, 200_000_000);
        assert_eq!(receipt.returned, 300_000_000);
        assert_eq!(ledger.balances(&PROVIDER), 1_800_000_000);
        assert_eq!(ledger.frozen_balance(&PROVIDER), 0);
        assert_eq!(ledger.slashed_funds(), 200_000_000);
        assert_eq!(ledger.tasks(&TASK).outcome, LockOutcome::Slashed);
    }

    #[test]
    fn test_slash_after_base_increase_is_invalid_state() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, 10 * SOL, 10 * SOL).unwrap();
        ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();
        ledger.set_base_collateral(&OWNER, SOL).unwrap();
        let before = ledger.clone();

        assert_eq!(ledger.slash_collateral(&ADMIN, TASK), Err(LedgerError::InvalidState));
        assert_eq!(ledger, before);
        // The bond can still be released
        assert!(ledger.unlock_collateral(&ADMIN, TASK).is_ok());
    }

    #[test]
    fn test_withdraw_slashed_funds() {
        let mut ledger = ledger_with_admin(SOL / 10);
        ledger.deposit(&PROVIDER, PROVIDER, 2 * SOL, 2 * SOL).unwrap();
        ledger.lock_collateral(&ADMIN, PROVIDER, TASK).unwrap();
        ledger.slash_collateral(&ADMIN, TASK).unwrap();

        assert_eq!(
            ledger.withdraw_slashed_funds(&ADMIN, SOL / 10),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            ledger.withdraw_slashed_funds(&OWNER, SOL),
            Err(LedgerError::InsufficientFunds)
        );
        assert_eq!(ledger.withdraw_slashed_funds(&OWNER, SOL / 5), Ok(0));
        assert_eq!(ledger.paid_out(&OWNER), SOL / 5);
        assert_eq!(ledger.custody(), 1_800_000_000);
    }

    #[test]
    fn test_owner_gated_parameters() {
        let mut ledger = ledger_with_admin(0);
        assert_eq!(ledger.set_collateral_ratio(&ADMIN, 10), Err(LedgerError::Unauthorized));
        assert_eq!(ledger.set_slash_ratio(&PROVIDER, 1), Err(LedgerError::Unauthorized));
        assert_eq!(ledger.set_base_collateral(&ADMIN, 1), Err(LedgerError::Unauthorized));

        ledger.set_collateral_ratio(&OWNER, 10).unwrap();
        ledger.set_slash_ratio(&OWNER, 5).unwrap();
        ledger.set_base_collateral(&OWNER, SOL).unwrap();
        assert_eq!(ledger.collateral_ratio(), 10);
        assert_eq!(ledger.slash_ratio(), 5);
        assert_eq!(ledger.get_base_collateral(), SOL);
    }

    #[test]
    fn test_non_admin_cannot_lock() {
        let mut ledger = ledger_with_admin(1);
        ledger.deposit(&PROVIDER, PROVIDER, SOL, SOL).unwrap();
        assert_eq!(
            ledger.lock_collateral(&PROVIDER, PROVIDER, TASK),
            Err(LedgerError::Unauthorized)
        );

        // Owner is an implicit admin
        ledger.lock_collateral(&OWNER, PROVIDER, TASK).unwrap();
        ledger.remove_admin(&OWNER, ADMIN).unwrap();
        assert_eq!(ledger.unlock_collateral(&ADMIN, TASK), Err(LedgerError::Unauthorized));
        assert_eq!(ledger.slash_collateral(&ADMIN, TASK), Err(LedgerError::Unauthorized));
    }

    #[test]
    fn test_independent_instances() {
        let mut first = ledger_with_admin(1);
        let second = SimulatedLedger::new(OTHER);
        first.deposit(&PROVIDER, PROVIDER, 10, 10).unwrap();

        assert_eq!(second.balances(&PROVIDER), 0);
        assert!(!second.is_admin(&ADMIN));
        assert!(second.is_admin(&OTHER));
    }

    #[test]
    fn test_shared_ledger_runs_operations() {
        let shared = SharedLedger::new(ledger_with_admin(1));
        shared
            .with(|ledger| ledger.deposit(&PROVIDER, PROVIDER, 100, 100))
            .unwrap();
        assert_eq!(shared.snapshot().balances(&PROVIDER), 100);
    }
}
