//! Initialize the collateral configuration

use crate::events::CollateralInitialized;
use crate::instructions::constants::CONFIG_SEED;
use crate::state::CollateralConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = owner,
        space = CollateralConfig::SIZE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub collateral_config: Account<'info, CollateralConfig>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, base_collateral: u64) -> Result<()> {
    // Validate parameters BEFORE writing any config
    CollateralConfig::validate_parameters(
        base_collateral,
        CollateralConfig::DEFAULT_COLLATERAL_RATIO,
        CollateralConfig::DEFAULT_SLASH_RATIO,
    )?;

    let config = &mut ctx.accounts.collateral_config;
    config.set_inner(CollateralConfig {
        owner: ctx.accounts.owner.key(),
        base_collateral,
        bump: ctx.bumps.collateral_config,
        ..Default::default()
    });

    msg!(
        "Collateral initialized: owner={} base={}",
        config.owner,
        config.base_collateral
    );

    emit!(CollateralInitialized {
        owner: config.owner,
        base_collateral: config.base_collateral,
        collateral_ratio: config.collateral_ratio,
        slash_ratio: config.slash_ratio,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
