//! Deposit lamports into a provider's collateral balance

use crate::errors::CollateralError;
use crate::events::CollateralDeposited;
use crate::instructions::constants::BALANCE_SEED;
use crate::instructions::settlement_helpers::verify_deposit;
use crate::state::CollateralBalance;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = CollateralBalance::SIZE,
        seeds = [BALANCE_SEED, account.as_ref()],
        bump
    )]
    pub balance: Account<'info, CollateralBalance>,

    pub system_program: Program<'info, System>,
}

/// Anyone may fund any provider's balance.
pub fn handler(ctx: Context<Deposit>, account: Pubkey, amount: u64) -> Result<()> {
    require!(amount > 0, CollateralError::InvalidParameter);

    let balance = &mut ctx.accounts.balance;

    // Both fields are fixed by the PDA seeds, so writing them is idempotent
    balance.account = account;
    balance.bump = ctx.bumps.balance;

    let balance_info = balance.to_account_info();
    let lamports_before = balance_info.lamports();

    anchor_lang::system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: balance_info.clone(),
            },
        ),
        amount,
    )?;

    verify_deposit(lamports_before, balance_info.lamports(), amount)?;
    balance.credit(amount)?;

    emit!(CollateralDeposited {
        depositor: ctx.accounts.depositor.key(),
        account,
        amount,
        available: balance.available,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
