//! Release a task's bond back to the provider (admin gated)

use crate::errors::CollateralError;
use crate::events::CollateralUnlocked;
use crate::instructions::constants::{CONFIG_SEED, TASK_LOCK_SEED};
use crate::instructions::lock_helpers::{load_balance, load_locked_task, store};
use crate::instructions::settlement_helpers::settle_release;
use crate::state::{CollateralConfig, LockOutcome};
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(task_id: Pubkey)]
pub struct UnlockCollateral<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = collateral_config.bump,
        constraint = collateral_config.is_admin(admin.key) @ CollateralError::Unauthorized,
    )]
    pub collateral_config: Account<'info, CollateralConfig>,

    /// CHECK: TaskLock PDA for `task_id`; may not exist yet. Owner and
    /// discriminator are checked by `load_locked_task`.
    #[account(
        mut,
        seeds = [TASK_LOCK_SEED, task_id.as_ref()],
        bump,
    )]
    pub task_lock: UncheckedAccount<'info>,

    /// CHECK: CollateralBalance PDA of the bonded provider, verified by
    /// `load_balance` against the task lock's account.
    #[account(mut)]
    pub balance: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<UnlockCollateral>, task_id: Pubkey) -> Result<()> {
    let task_lock_info = ctx.accounts.task_lock.to_account_info();
    let balance_info = ctx.accounts.balance.to_account_info();

    let mut task_lock = load_locked_task(&task_lock_info, ctx.program_id)?;
    let mut balance = load_balance(&balance_info, ctx.program_id, &task_lock.account)?;

    let clock = Clock::get()?;
    settle_release(&mut balance, task_lock.collateral)?;
    task_lock.resolve(LockOutcome::Released, clock.unix_timestamp)?;

    store(&balance_info, &balance)?;
    store(&task_lock_info, &task_lock)?;

    emit!(CollateralUnlocked {
        task_id,
        account: task_lock.account,
        collateral: task_lock.collateral,
        available: balance.available,
        frozen: balance.frozen,
        unlocked_by: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
