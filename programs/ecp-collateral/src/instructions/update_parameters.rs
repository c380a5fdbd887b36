//! Update collateral parameters (owner gated)
//!
//! Every setter re-validates the full parameter set, so the bond required by
//! `collateral_ratio` always covers the penalty taken by `slash_ratio`.

use crate::errors::CollateralError;
use crate::events::{BaseCollateralUpdated, CollateralRatioUpdated, SlashRatioUpdated};
use crate::instructions::constants::CONFIG_SEED;
use crate::state::CollateralConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct UpdateParameters<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = collateral_config.bump,
        has_one = owner @ CollateralError::Unauthorized,
    )]
    pub collateral_config: Account<'info, CollateralConfig>,
}

pub fn set_collateral_ratio_handler(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
    let old_ratio = ctx.accounts.collateral_config.set_collateral_ratio(value)?;

    emit!(CollateralRatioUpdated {
        old_ratio,
        new_ratio: value,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn set_slash_ratio_handler(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
    let old_ratio = ctx.accounts.collateral_config.set_slash_ratio(value)?;

    emit!(SlashRatioUpdated {
        old_ratio,
        new_ratio: value,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn set_base_collateral_handler(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
    let old_base_collateral = ctx.accounts.collateral_config.set_base_collateral(value)?;

    emit!(BaseCollateralUpdated {
        old_base_collateral,
        new_base_collateral: value,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
