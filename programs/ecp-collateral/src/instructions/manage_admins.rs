//! Add and remove admins (owner gated)

use crate::errors::CollateralError;
use crate::events::{AdminAdded, AdminRemoved};
use crate::instructions::constants::CONFIG_SEED;
use crate::state::CollateralConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ManageAdmins<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = collateral_config.bump,
        has_one = owner @ CollateralError::Unauthorized,
    )]
    pub collateral_config: Account<'info, CollateralConfig>,
}

pub fn add_admin_handler(ctx: Context<ManageAdmins>, admin: Pubkey) -> Result<()> {
    let config = &mut ctx.accounts.collateral_config;
    if !config.add_admin(admin)? {
        msg!("{} is already an admin", admin);
        return Ok(());
    }

    emit!(AdminAdded {
        admin,
        admin_count: config.admins_len,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn remove_admin_handler(ctx: Context<ManageAdmins>, admin: Pubkey) -> Result<()> {
    let config = &mut ctx.accounts.collateral_config;
    if !config.remove_admin(admin)? {
        msg!("{} is not an admin", admin);
        return Ok(());
    }

    emit!(AdminRemoved {
        admin,
        admin_count: config.admins_len,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
