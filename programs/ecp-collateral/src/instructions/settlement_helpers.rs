//! Balance settlement shared by the lock, unlock and slash handlers.
//!
//! Each helper stages its changes on a copy of the balance and commits only
//! once every step succeeded, so a failure leaves the balance untouched even
//! before the runtime rolls the transaction back.

use crate::errors::CollateralError;
use crate::state::CollateralBalance;
use anchor_lang::prelude::*;

/// Amounts moved by a slash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashSettlement {
    /// Lamports forfeited to the slashed-funds pool
    pub penalty: u64,
    /// Lamports of the bond returned to the provider's available balance
    pub returned: u64,
}

/// Freezes `collateral` out of the provider's available balance.
pub fn settle_lock(balance: &mut CollateralBalance, collateral: u64) -> Result<()> {
    balance.freeze(collateral)
}

/// Returns the full bond to the provider's available balance.
pub fn settle_release(balance: &mut CollateralBalance, collateral: u64) -> Result<()> {
    balance.unfreeze(collateral)
}

/// Unfreezes the full bond, then debits the flat penalty from it.
///
/// The remainder `collateral - penalty` stays available to the provider.
pub fn settle_slash(
    balance: &mut CollateralBalance,
    collateral: u64,
    penalty: u64,
) -> Result<SlashSettlement> {
    require!(penalty <= collateral, CollateralError::InvalidState);

    let mut staged = balance.clone();
    staged.unfreeze(collateral)?;
    staged.debit(penalty)?;
    *balance = staged;

    Ok(SlashSettlement {
        penalty,
        returned: collateral - penalty,
    })
}

/// Verifies that a deposit moved exactly `amount` lamports into custody.
pub fn verify_deposit(lamports_before: u64, lamports_after: u64, amount: u64) -> Result<()> {
    let received = lamports_after
        .checked_sub(lamports_before)
        .ok_or(CollateralError::InvalidParameter)?;
    require!(received == amount, CollateralError::InvalidParameter);
    Ok(())
}
