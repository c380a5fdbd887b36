//! Loading and storing task locks and balances for unlock and slash.
//!
//! Both handlers take these PDAs as raw accounts so a task id that was never
//! locked reports `TaskNotLocked` instead of failing account validation.

use crate::errors::CollateralError;
use crate::instructions::constants::BALANCE_SEED;
use crate::state::{CollateralBalance, TaskLock};
use anchor_lang::prelude::*;

/// Reads the task lock at `info`, which must hold a `Locked` record.
///
/// An address with no data, or data not owned by this program, is a task
/// that was never locked.
pub fn load_locked_task(info: &AccountInfo, program_id: &Pubkey) -> Result<TaskLock> {
    if info.owner != program_id || info.data_is_empty() {
        return err!(CollateralError::TaskNotLocked);
    }
    let data = info.try_borrow_data()?;
    let task_lock = TaskLock::try_deserialize(&mut &data[..])?;
    require!(task_lock.is_locked(), CollateralError::TaskNotLocked);
    Ok(task_lock)
}

/// Reads the balance at `info` and checks it is the balance PDA of `account`.
pub fn load_balance(
    info: &AccountInfo,
    program_id: &Pubkey,
    account: &Pubkey,
) -> Result<CollateralBalance> {
    require!(info.owner == program_id, CollateralError::InvalidParameter);
    let data = info.try_borrow_data()?;
    let balance = CollateralBalance::try_deserialize(&mut &data[..])?;
    drop(data);

    require!(balance.account == *account, CollateralError::InvalidParameter);
    let expected = Pubkey::create_program_address(
        &[BALANCE_SEED, account.as_ref(), &[balance.bump]],
        program_id,
    )
    .map_err(|_| error!(CollateralError::InvalidParameter))?;
    require!(info.key() == expected, CollateralError::InvalidParameter);
    Ok(balance)
}

/// Writes an account struct back, discriminator included.
pub fn store<T: AccountSerialize>(info: &AccountInfo, value: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    value.try_serialize(&mut &mut data[..])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LockOutcome, TaskLockStatus};
    use crate::test_utils::assert_collateral_err;

    fn serialized<T: AccountSerialize>(value: &T, size: usize) -> Vec<u8> {
        let mut data = vec![0u8; size];
        value.try_serialize(&mut &mut data[..]).unwrap();
        data
    }

    fn locked(account: Pubkey) -> TaskLock {
        TaskLock {
            task_id: Pubkey::new_unique(),
            account,
            collateral: 500,
            status: TaskLockStatus::Locked,
            outcome: LockOutcome::Pending,
            locked_at: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_task_is_not_locked() {
        let key = Pubkey::new_unique();
        let system = Pubkey::default();
        let mut lamports = 0;
        let mut data: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);

        assert_collateral_err(load_locked_task(&info, &crate::ID), CollateralError::TaskNotLocked);
    }

    #[test]
    fn test_foreign_owner_is_not_locked() {
        let key = Pubkey::new_unique();
        let other_program = Pubkey::new_unique();
        let mut lamports = 1_000;
        let mut data = serialized(&locked(Pubkey::new_unique()), TaskLock::SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &other_program, false, 0);

        assert_collateral_err(load_locked_task(&info, &crate::ID), CollateralError::TaskNotLocked);
    }

    #[test]
    fn test_resolved_task_is_not_locked() {
        let key = Pubkey::new_unique();
        let program_id = crate::ID;
        let mut record = locked(Pubkey::new_unique());
        record.resolve(LockOutcome::Released, 11).unwrap();
        let mut lamports = 1_000;
        let mut data = serialized(&record, TaskLock::SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program_id, false, 0);

        assert_collateral_err(load_locked_task(&info, &crate::ID), CollateralError::TaskNotLocked);
    }

    #[test]
    fn test_locked_task_round_trips_through_store() {
        let key = Pubkey::new_unique();
        let program_id = crate::ID;
        let account = Pubkey::new_unique();
        let mut lamports = 1_000;
        let mut data = serialized(&locked(account), TaskLock::SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program_id, false, 0);

        let mut record = load_locked_task(&info, &crate::ID).unwrap();
        assert_eq!(record.account, account);
        assert_eq!(record.collateral, 500);

        record.resolve(LockOutcome::Slashed, 12).unwrap();
        store(&info, &record).unwrap();
        assert_collateral_err(load_locked_task(&info, &crate::ID), CollateralError::TaskNotLocked);
    }

    #[test]
    fn test_balance_must_be_the_account_pda() {
        let program_id = crate::ID;
        let account = Pubkey::new_unique();
        let (pda, bump) =
            Pubkey::find_program_address(&[BALANCE_SEED, account.as_ref()], &program_id);
        let balance = CollateralBalance {
            account,
            available: 100,
            frozen: 500,
            bump,
        };

        let mut lamports = 1_000;
        let mut data = serialized(&balance, CollateralBalance::SIZE);
        let info = AccountInfo::new(&pda, false, true, &mut lamports, &mut data, &program_id, false, 0);
        let loaded = load_balance(&info, &program_id, &account).unwrap();
        assert_eq!((loaded.available, loaded.frozen), (100, 500));

        assert_collateral_err(
            load_balance(&info, &program_id, &Pubkey::new_unique()),
            CollateralError::InvalidParameter,
        );

        let wrong_key = Pubkey::new_unique();
        let mut lamports = 1_000;
        let mut data = serialized(&balance, CollateralBalance::SIZE);
        let info = AccountInfo::new(&wrong_key, false, true, &mut lamports, &mut data, &program_id, false, 0);
        assert_collateral_err(
            load_balance(&info, &program_id, &account),
            CollateralError::InvalidParameter,
        );
    }
}
