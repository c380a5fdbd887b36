#![allow(unexpected_cfgs)]
//! ECP Collateral
//!
//! Collateral escrow and slashing ledger for compute providers. Providers
//! deposit lamports as a behavioral bond, admins lock a bond per accepted
//! task, and each bond is either released back to the provider or slashed
//! into a protocol-owned pool.

use anchor_lang::prelude::*;

declare_id!("8nJ4vKc7b2xQ1RGk6WEyqSxTtLzYpVuHdMeF3aZoNw5C");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

use instructions::*;

#[program]
pub mod ecp_collateral {
    use super::*;

    /// Create the collateral configuration. The signer becomes the
    /// immutable owner; ratios start at their defaults (5 and 2).
    ///
    /// # Arguments
    /// * `ctx` - Context with the config PDA and the paying owner
    /// * `base_collateral` - Base collateral unit in lamports
    pub fn initialize(ctx: Context<Initialize>, base_collateral: u64) -> Result<()> {
        instructions::initialize::handler(ctx, base_collateral)
    }

    /// Grant admin rights (owner only).
    pub fn add_admin(ctx: Context<ManageAdmins>, admin: Pubkey) -> Result<()> {
        instructions::manage_admins::add_admin_handler(ctx, admin)
    }

    /// Revoke admin rights (owner only).
    pub fn remove_admin(ctx: Context<ManageAdmins>, admin: Pubkey) -> Result<()> {
        instructions::manage_admins::remove_admin_handler(ctx, admin)
    }

    /// Set the bond multiple of the base collateral (owner only).
    /// Must stay positive and at least the slash ratio.
    pub fn set_collateral_ratio(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
        instructions::update_parameters::set_collateral_ratio_handler(ctx, value)
    }

    /// Set the penalty multiple of the base collateral (owner only).
    /// Must stay positive and at most the collateral ratio.
    pub fn set_slash_ratio(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
        instructions::update_parameters::set_slash_ratio_handler(ctx, value)
    }

    /// Set the base collateral unit in lamports (owner only).
    pub fn set_base_collateral(ctx: Context<UpdateParameters>, value: u64) -> Result<()> {
        instructions::update_parameters::set_base_collateral_handler(ctx, value)
    }

    /// Deposit lamports into a provider's available balance.
    /// Any signer may fund any provider.
    ///
    /// # Arguments
    /// * `account` - Provider whose balance is credited
    /// * `amount` - Lamports transferred from the depositor
    pub fn deposit(ctx: Context<Deposit>, account: Pubkey, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, account, amount)
    }

    /// Withdraw available lamports. Only the provider itself may call this.
    pub fn withdraw(ctx: Context<Withdraw>, account: Pubkey, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, account, amount)
    }

    /// Freeze `base_collateral * collateral_ratio` of a provider's balance
    /// as the bond for a task (admin only). Each task id can be locked once.
    pub fn lock_collateral(
        ctx: Context<LockCollateral>,
        account: Pubkey,
        task_id: Pubkey,
    ) -> Result<()> {
        instructions::lock_collateral::handler(ctx, account, task_id)
    }

    /// Release a task's bond back to the provider (admin only).
    pub fn unlock_collateral(ctx: Context<UnlockCollateral>, task_id: Pubkey) -> Result<()> {
        instructions::unlock_collateral::handler(ctx, task_id)
    }

    /// Forfeit `base_collateral * slash_ratio` of a task's bond to the
    /// slashed-funds pool and return the remainder (admin only).
    pub fn slash_collateral(ctx: Context<SlashCollateral>, task_id: Pubkey) -> Result<()> {
        instructions::slash_collateral::handler(ctx, task_id)
    }

    /// Withdraw lamports from the slashed-funds pool (owner only).
    pub fn withdraw_slashed_funds(ctx: Context<WithdrawSlashedFunds>, amount: u64) -> Result<()> {
        instructions::withdraw_slashed_funds::handler(ctx, amount)
    }
}
