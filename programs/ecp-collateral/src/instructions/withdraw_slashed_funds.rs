//! Withdraw from the slashed-funds pool (owner gated)

use crate::errors::CollateralError;
use crate::events::SlashedFundsWithdrawn;
use crate::instructions::constants::CONFIG_SEED;
use crate::instructions::lamport_transfer::transfer_lamports;
use crate::state::CollateralConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct WithdrawSlashedFunds<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = collateral_config.bump,
        has_one = owner @ CollateralError::Unauthorized,
    )]
    pub collateral_config: Account<'info, CollateralConfig>,
}

pub fn handler(ctx: Context<WithdrawSlashedFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, CollateralError::InvalidParameter);

    let config = &mut ctx.accounts.collateral_config;
    config.debit_slashed(amount)?;
    transfer_lamports(
        &config.to_account_info(),
        &ctx.accounts.owner.to_account_info(),
        amount,
    )?;

    emit!(SlashedFundsWithdrawn {
        owner: config.owner,
        amount,
        remaining: config.slashed_funds,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
