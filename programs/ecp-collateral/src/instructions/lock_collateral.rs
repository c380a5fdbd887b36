//! Bond a provider's collateral to a task (admin gated)

use crate::errors::CollateralError;
use crate::events::CollateralLocked;
use crate::instructions::constants::{BALANCE_SEED, CONFIG_SEED, TASK_LOCK_SEED};
use crate::instructions::settlement_helpers::settle_lock;
use crate::state::{CollateralBalance, CollateralConfig, TaskLock, TaskLockStatus};
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(account: Pubkey, task_id: Pubkey)]
pub struct LockCollateral<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = collateral_config.bump,
        constraint = collateral_config.is_admin(admin.key) @ CollateralError::Unauthorized,
    )]
    pub collateral_config: Account<'info, CollateralConfig>,

    /// Created empty for unseen providers so the lock fails on funds, not on lookup
    #[account(
        init_if_needed,
        payer = admin,
        space = CollateralBalance::SIZE,
        seeds = [BALANCE_SEED, account.as_ref()],
        bump
    )]
    pub balance: Account<'info, CollateralBalance>,

    #[account(
        init_if_needed,
        payer = admin,
        space = TaskLock::SIZE,
        seeds = [TASK_LOCK_SEED, task_id.as_ref()],
        bump
    )]
    pub task_lock: Account<'info, TaskLock>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<LockCollateral>, account: Pubkey, task_id: Pubkey) -> Result<()> {
    let task_lock = &mut ctx.accounts.task_lock;
    let balance = &mut ctx.accounts.balance;

    // A resolved record is history; the task id is never reused
    require!(
        task_lock.status == TaskLockStatus::None,
        CollateralError::TaskAlreadyLocked
    );

    let required = ctx.accounts.collateral_config.required_collateral()?;

    balance.account = account;
    balance.bump = ctx.bumps.balance;

    let clock = Clock::get()?;
    settle_lock(balance, required)?;
    task_lock.begin(task_id, account, required, clock.unix_timestamp)?;
    task_lock.bump = ctx.bumps.task_lock;

    emit!(CollateralLocked {
        task_id,
        account,
        collateral: required,
        available: balance.available,
        frozen: balance.frozen,
        locked_by: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
