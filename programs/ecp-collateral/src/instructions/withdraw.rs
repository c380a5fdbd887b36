//! Withdraw available collateral back to the provider

use crate::errors::CollateralError;
use crate::events::CollateralWithdrawn;
use crate::instructions::constants::BALANCE_SEED;
use crate::instructions::lamport_transfer::transfer_lamports;
use crate::state::CollateralBalance;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct Withdraw<'info> {
    /// Only the provider itself may withdraw its own balance
    #[account(
        mut,
        constraint = caller.key() == account @ CollateralError::Unauthorized,
    )]
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [BALANCE_SEED, account.as_ref()],
        bump = balance.bump,
    )]
    pub balance: Account<'info, CollateralBalance>,
}

pub fn handler(ctx: Context<Withdraw>, account: Pubkey, amount: u64) -> Result<()> {
    require!(amount > 0, CollateralError::InvalidParameter);

    let balance = &mut ctx.accounts.balance;

    // Ledger first, lamports second
    balance.debit(amount)?;
    transfer_lamports(
        &balance.to_account_info(),
        &ctx.accounts.caller.to_account_info(),
        amount,
    )?;

    emit!(CollateralWithdrawn {
        account,
        amount,
        available: balance.available,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
