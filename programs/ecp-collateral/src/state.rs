//! Account state structures for the ECP collateral program

use anchor_lang::prelude::*;

use crate::errors::CollateralError;

/// Lifecycle of a task's collateral lock.
///
/// `None → Locked → Resolved`. `Resolved` is terminal: a task identifier
/// that has been unlocked or slashed can never be locked again.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
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

/// How a resolved lock was settled
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
#[repr(u8)]
pub enum LockOutcome {
    #[default]
    Pending = 0,
    /// Full bond returned to the provider
    Released = 1,
    /// Penalty moved to the slashed-funds pool, remainder returned
    Slashed = 2,
}

/// Global collateral configuration, role registry and slashed-funds pool.
/// PDA seeds: ["collateral_config"]
#[account]
#[derive(InitSpace)]
pub struct CollateralConfig {
    /// Owning authority. Manages admins, parameters and the slashed pool.
    /// Note: Cannot be updated after initialization.
    pub owner: Pubkey,
    /// Explicit admin set. Only the first `admins_len` entries are valid;
    /// remaining slots are always `Pubkey::default()`.
    pub admins: [Pubkey; CollateralConfig::MAX_ADMINS],
    /// Number of populated admin slots
    pub admins_len: u8,
    /// Base collateral unit in lamports
    pub base_collateral: u64,
    /// Bond required per task, as a multiple of `base_collateral`
    pub collateral_ratio: u64,
    /// Penalty taken on slash, as a multiple of `base_collateral`
    pub slash_ratio: u64,
    /// Protocol-owned pool of slashed lamports held by this account
    pub slashed_funds: u64,
    /// Bump seed for PDA
    pub bump: u8,
    /// Padding for future use and alignment
    pub _padding: [u8; 6],
}

impl Default for CollateralConfig {
    fn default() -> Self {
        Self {
            owner: Pubkey::default(),
            admins: [Pubkey::default(); CollateralConfig::MAX_ADMINS],
            admins_len: 0,
            base_collateral: 0,
            collateral_ratio: CollateralConfig::DEFAULT_COLLATERAL_RATIO,
            slash_ratio: CollateralConfig::DEFAULT_SLASH_RATIO,
            slashed_funds: 0,
            bump: 0,
            _padding: [0u8; 6],
        }
    }
}

impl CollateralConfig {
    pub const MAX_ADMINS: usize = 16;
    pub const DEFAULT_COLLATERAL_RATIO: u64 = 5;
    pub const DEFAULT_SLASH_RATIO: u64 = 2;
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner
        (32 * Self::MAX_ADMINS) + // admins
        1 +  // admins_len
        8 +  // base_collateral
        8 +  // collateral_ratio
        8 +  // slash_ratio
        8 +  // slashed_funds
        1 +  // bump
        6; // padding

    pub fn admins(&self) -> &[Pubkey] {
        let len = (self.admins_len as usize).min(Self::MAX_ADMINS);
        &self.admins[..len]
    }

    /// Owner is implicitly an admin even though it never sits in `admins`.
    pub fn is_admin(&self, address: &Pubkey) -> bool {
        *address == self.owner || self.admins().contains(address)
    }

    /// Returns `true` if the address was inserted, `false` if already present.
    pub fn add_admin(&mut self, admin: Pubkey) -> Result<bool> {
        require!(
            admin != Pubkey::default() && admin != self.owner,
            CollateralError::InvalidParameter
        );
        if self.admins().contains(&admin) {
            return Ok(false);
        }
        let len = self.admins_len as usize;
        require!(len < Self::MAX_ADMINS, CollateralError::AdminSetFull);

        self.admins[len] = admin;
        self.admins_len = self
            .admins_len
            .checked_add(1)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        Ok(true)
    }

    /// Returns `true` if the address was removed, `false` if it was not an admin.
    pub fn remove_admin(&mut self, admin: Pubkey) -> Result<bool> {
        require!(
            admin != Pubkey::default() && admin != self.owner,
            CollateralError::InvalidParameter
        );
        let len = self.admins().len();
        let Some(index) = self.admins().iter().position(|a| *a == admin) else {
            return Ok(false);
        };

        // Swap-remove keeps populated slots contiguous
        self.admins[index] = self.admins[len - 1];
        self.admins[len - 1] = Pubkey::default();
        self.admins_len = self
            .admins_len
            .checked_sub(1)
            .ok_or(CollateralError::InvalidState)?;
        Ok(true)
    }

    /// Bond frozen per lock: `base_collateral * collateral_ratio`
    pub fn required_collateral(&self) -> Result<u64> {
        self.base_collateral
            .checked_mul(self.collateral_ratio)
            .ok_or(error!(CollateralError::ArithmeticOverflow))
    }

    /// Flat penalty taken on slash: `base_collateral * slash_ratio`
    pub fn slash_penalty(&self) -> Result<u64> {
        self.base_collateral
            .checked_mul(self.slash_ratio)
            .ok_or(error!(CollateralError::ArithmeticOverflow))
    }

    /// Ratios must be positive and the bond must cover the penalty.
    pub fn validate_parameters(
        base_collateral: u64,
        collateral_ratio: u64,
        slash_ratio: u64,
    ) -> Result<()> {
        require!(
            collateral_ratio > 0 && slash_ratio > 0,
            CollateralError::InvalidParameter
        );
        require!(
            slash_ratio <= collateral_ratio,
            CollateralError::InvalidParameter
        );
        base_collateral
            .checked_mul(collateral_ratio)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn set_collateral_ratio(&mut self, value: u64) -> Result<u64> {
        Self::validate_parameters(self.base_collateral, value, self.slash_ratio)?;
        Ok(std::mem::replace(&mut self.collateral_ratio, value))
    }

    pub fn set_slash_ratio(&mut self, value: u64) -> Result<u64> {
        Self::validate_parameters(self.base_collateral, self.collateral_ratio, value)?;
        Ok(std::mem::replace(&mut self.slash_ratio, value))
    }

    pub fn set_base_collateral(&mut self, value: u64) -> Result<u64> {
        Self::validate_parameters(value, self.collateral_ratio, self.slash_ratio)?;
        Ok(std::mem::replace(&mut self.base_collateral, value))
    }

    pub fn credit_slashed(&mut self, amount: u64) -> Result<()> {
        self.slashed_funds = self
            .slashed_funds
            .checked_add(amount)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn debit_slashed(&mut self, amount: u64) -> Result<()> {
        self.slashed_funds = self
            .slashed_funds
            .checked_sub(amount)
            .ok_or(CollateralError::InsufficientFunds)?;
        Ok(())
    }
}

/// Per-provider collateral balance. Holds the provider's deposited lamports.
/// PDA seeds: ["balance", account]
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct CollateralBalance {
    /// Provider account this balance belongs to
    pub account: Pubkey,
    /// Spendable lamports
    pub available: u64,
    /// Lamports bonded to locked tasks
    pub frozen: u64,
    /// Bump seed for PDA
    pub bump: u8,
}

impl CollateralBalance {
    pub const SIZE: usize = 8 + // discriminator
        32 + // account
        8 +  // available
        8 +  // frozen
        1; // bump

    /// Total lamports held for the provider (available + frozen)
    pub fn total(&self) -> Result<u64> {
        self.available
            .checked_add(self.frozen)
            .ok_or(error!(CollateralError::ArithmeticOverflow))
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.available = self
            .available
            .checked_add(amount)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.available = self
            .available
            .checked_sub(amount)
            .ok_or(CollateralError::InsufficientFunds)?;
        Ok(())
    }

    pub fn freeze(&mut self, amount: u64) -> Result<()> {
        let available = self
            .available
            .checked_sub(amount)
            .ok_or(CollateralError::InsufficientFunds)?;
        let frozen = self
            .frozen
            .checked_add(amount)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        self.available = available;
        self.frozen = frozen;
        Ok(())
    }

    pub fn unfreeze(&mut self, amount: u64) -> Result<()> {
        let frozen = self
            .frozen
            .checked_sub(amount)
            .ok_or(CollateralError::InsufficientFunds)?;
        let available = self
            .available
            .checked_add(amount)
            .ok_or(CollateralError::ArithmeticOverflow)?;
        self.available = available;
        self.frozen = frozen;
        Ok(())
    }
}

/// Collateral lock for a single task. Persists after resolution as history.
/// PDA seeds: ["task_lock", task_id]
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct TaskLock {
    /// Task identifier (task account address)
    pub task_id: Pubkey,
    /// Provider whose collateral is bonded
    pub account: Pubkey,
    /// Bonded lamports
    pub collateral: u64,
    /// Lock status
    pub status: TaskLockStatus,
    /// Settlement outcome once resolved
    pub outcome: LockOutcome,
    /// Lock timestamp
    pub locked_at: i64,
    /// Resolution timestamp (0 while locked)
    pub resolved_at: i64,
    /// Bump seed for PDA
    pub bump: u8,
}

impl TaskLock {
    pub const SIZE: usize = 8 + // discriminator
        32 + // task_id
        32 + // account
        8 +  // collateral
        1 +  // status
        1 +  // outcome
        8 +  // locked_at
        8 +  // resolved_at
        1; // bump

    pub fn is_locked(&self) -> bool {
        self.status == TaskLockStatus::Locked
    }

    /// Records a new lock. Any existing record, active or resolved, is rejected.
    pub fn begin(
        &mut self,
        task_id: Pubkey,
        account: Pubkey,
        collateral: u64,
        now: i64,
    ) -> Result<()> {
        require!(
            self.status.can_transition_to(TaskLockStatus::Locked),
            CollateralError::TaskAlreadyLocked
        );
        self.task_id = task_id;
        self.account = account;
        self.collateral = collateral;
        self.status = TaskLockStatus::Locked;
        self.outcome = LockOutcome::Pending;
        self.locked_at = now;
        self.resolved_at = 0;
        Ok(())
    }

    pub fn resolve(&mut self, outcome: LockOutcome, now: i64) -> Result<()> {
        require!(
            self.status.can_transition_to(TaskLockStatus::Resolved),
            CollateralError::TaskNotLocked
        );
        require!(
            outcome != LockOutcome::Pending,
            CollateralError::InvalidState
        );
        self.status = TaskLockStatus::Resolved;
        self.outcome = outcome;
        self.resolved_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_collateral_err;

    /// SIZE should equal INIT_SPACE (borsh serialized) + 8-byte discriminator.
    macro_rules! test_size_constant {
        ($struct:ty) => {
            assert_eq!(
                <$struct>::SIZE,
                <$struct as anchor_lang::Space>::INIT_SPACE + 8,
                concat!(stringify!($struct), "::SIZE mismatch with INIT_SPACE")
            );
        };
    }

    fn config_with_owner(owner: Pubkey) -> CollateralConfig {
        CollateralConfig {
            owner,
            ..Default::default()
        }
    }

    #[test]
    fn test_collateral_config_size() {
        test_size_constant!(CollateralConfig);
    }

    #[test]
    fn test_collateral_balance_size() {
        test_size_constant!(CollateralBalance);
    }

    #[test]
    fn test_task_lock_size() {
        test_size_constant!(TaskLock);
    }

    #[test]
    fn test_default_config_ratios() {
        let config = CollateralConfig::default();
        assert_eq!(config.collateral_ratio, 5);
        assert_eq!(config.slash_ratio, 2);
        assert_eq!(config.base_collateral, 0);
        assert!(config.admins().is_empty());
    }

    #[test]
    fn test_owner_is_implicit_admin() {
        let owner = Pubkey::new_unique();
        let config = config_with_owner(owner);
        assert!(config.is_admin(&owner));
        assert!(!config.is_admin(&Pubkey::new_unique()));
    }

    #[test]
    fn test_add_and_remove_admin() {
        let owner = Pubkey::new_unique();
        let admin = Pubkey::new_unique();
        let mut config = config_with_owner(owner);

        assert!(config.add_admin(admin).unwrap());
        assert!(config.is_admin(&admin));
        assert!(!config.add_admin(admin).unwrap());
        assert_eq!(config.admins_len, 1);

        assert!(config.remove_admin(admin).unwrap());
        assert!(!config.is_admin(&admin));
        assert!(!config.remove_admin(admin).unwrap());
        assert_eq!(config.admins_len, 0);
        assert_eq!(config.admins[0], Pubkey::default());
    }

    #[test]
    fn test_remove_admin_keeps_slots_contiguous() {
        let mut config = config_with_owner(Pubkey::new_unique());
        let admins: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for admin in &admins {
            config.add_admin(*admin).unwrap();
        }

        config.remove_admin(admins[0]).unwrap();
        assert_eq!(config.admins(), &[admins[2], admins[1]]);
        assert!(config.is_admin(&admins[1]));
        assert!(config.is_admin(&admins[2]));
    }

    #[test]
    fn test_owner_never_enters_admin_set() {
        let owner = Pubkey::new_unique();
        let mut config = config_with_owner(owner);
        assert_collateral_err(config.add_admin(owner), CollateralError::InvalidParameter);
        assert_collateral_err(config.remove_admin(owner), CollateralError::InvalidParameter);
        assert_collateral_err(
            config.add_admin(Pubkey::default()),
            CollateralError::InvalidParameter,
        );
        assert!(config.is_admin(&owner));
    }

    #[test]
    fn test_admin_set_capacity() {
        let mut config = config_with_owner(Pubkey::new_unique());
        for _ in 0..CollateralConfig::MAX_ADMINS {
            config.add_admin(Pubkey::new_unique()).unwrap();
        }
        assert_collateral_err(
            config.add_admin(Pubkey::new_unique()),
            CollateralError::AdminSetFull,
        );
    }

    #[test]
    fn test_required_collateral_and_penalty() {
        let mut config = CollateralConfig::default();
        config.set_base_collateral(100_000_000).unwrap();
        assert_eq!(config.required_collateral().unwrap(), 500_000_000);
        assert_eq!(config.slash_penalty().unwrap(), 200_000_000);
    }

    #[test]
    fn test_products_and_totals_report_overflow() {
        let config = CollateralConfig {
            base_collateral: u64::MAX,
            ..Default::default()
        };
        assert_collateral_err(config.required_collateral(), CollateralError::ArithmeticOverflow);
        assert_collateral_err(config.slash_penalty(), CollateralError::ArithmeticOverflow);

        let balance = CollateralBalance {
            available: u64::MAX,
            frozen: 1,
            ..Default::default()
        };
        assert_collateral_err(balance.total(), CollateralError::ArithmeticOverflow);
    }

    #[test]
    fn test_ratio_validation() {
        let mut config = CollateralConfig::default();
        assert_collateral_err(config.set_collateral_ratio(0), CollateralError::InvalidParameter);
        assert_collateral_err(config.set_slash_ratio(0), CollateralError::InvalidParameter);
        // Slash ratio above collateral ratio would leave the bond short of the penalty
        assert_collateral_err(config.set_slash_ratio(6), CollateralError::InvalidParameter);
        assert_collateral_err(config.set_collateral_ratio(1), CollateralError::InvalidParameter);

        assert_eq!(config.set_collateral_ratio(10).unwrap(), 5);
        assert_eq!(config.set_slash_ratio(5).unwrap(), 2);
        assert_eq!(config.collateral_ratio, 10);
        assert_eq!(config.slash_ratio, 5);
    }

    #[test]
    fn test_base_collateral_overflow_rejected() {
        let mut config = CollateralConfig::default();
        assert_collateral_err(
            config.set_base_collateral(u64::MAX),
            CollateralError::ArithmeticOverflow,
        );
        assert_eq!(config.base_collateral, 0);
    }

    #[test]
    fn test_slashed_pool_bounds() {
        let mut config = CollateralConfig::default();
        config.credit_slashed(200).unwrap();
        assert_collateral_err(config.debit_slashed(201), CollateralError::InsufficientFunds);
        config.debit_slashed(200).unwrap();
        assert_eq!(config.slashed_funds, 0);
    }

    #[test]
    fn test_balance_freeze_unfreeze() {
        let mut balance = CollateralBalance::default();
        balance.credit(1_000).unwrap();
        balance.freeze(400).unwrap();
        assert_eq!((balance.available, balance.frozen), (600, 400));

        assert_collateral_err(balance.freeze(601), CollateralError::InsufficientFunds);
        assert_collateral_err(balance.unfreeze(401), CollateralError::InsufficientFunds);
        assert_eq!((balance.available, balance.frozen), (600, 400));

        balance.unfreeze(400).unwrap();
        assert_eq!((balance.available, balance.frozen), (1_000, 0));
    }

    #[test]
    fn test_balance_debit_never_clamps() {
        let mut balance = CollateralBalance::default();
        balance.credit(10).unwrap();
        assert_collateral_err(balance.debit(11), CollateralError::InsufficientFunds);
        assert_eq!(balance.available, 10);
        assert_collateral_err(balance.credit(u64::MAX), CollateralError::ArithmeticOverflow);
    }

    #[test]
    fn test_task_lock_state_machine() {
        use TaskLockStatus::*;
        assert!(None.can_transition_to(Locked));
        assert!(Locked.can_transition_to(Resolved));
        assert!(!Resolved.can_transition_to(Locked));
        assert!(!None.can_transition_to(Resolved));
        assert!(!Locked.can_transition_to(Locked));
    }

    #[test]
    fn test_task_lock_is_single_use() {
        let task_id = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let mut lock = TaskLock::default();

        assert_collateral_err(
            lock.resolve(LockOutcome::Released, 1),
            CollateralError::TaskNotLocked,
        );
        lock.begin(task_id, account, 500, 10).unwrap();
        assert!(lock.is_locked());
        assert_collateral_err(
            lock.begin(task_id, account, 500, 11),
            CollateralError::TaskAlreadyLocked,
        );

        lock.resolve(LockOutcome::Slashed, 12).unwrap();
        assert_eq!(lock.status, TaskLockStatus::Resolved);
        assert_eq!(lock.outcome, LockOutcome::Slashed);
        assert_eq!(lock.resolved_at, 12);

        assert_collateral_err(
            lock.begin(task_id, account, 500, 13),
            CollateralError::TaskAlreadyLocked,
        );
        assert_collateral_err(
            lock.resolve(LockOutcome::Released, 13),
            CollateralError::TaskNotLocked,
        );
    }
}
