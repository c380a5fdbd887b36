//! Lamport movement out of program-owned collateral accounts.
//!
//! Balance and config PDAs hold the lamports their ledgers account for, on
//! top of their rent-exempt reserve. Outbound transfers debit the PDA directly
//! and must never eat into that reserve.

use crate::errors::CollateralError;
use anchor_lang::prelude::*;

/// Transfer `amount` lamports from a program-owned account to any account
/// using checked arithmetic.
///
/// Returns `Ok(())` immediately if `amount == 0` (no-op).
/// Returns `CollateralError::InvalidState` if the source would drop below
/// its rent-exempt minimum, which means the ledger and the lamports disagree.
pub fn transfer_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let rent_exempt_min = Rent::get()?.minimum_balance(from.data_len());
    transfer_above_floor(from, to, amount, rent_exempt_min)
}

/// Moves `amount` lamports as long as `from` keeps at least `floor`.
fn transfer_above_floor<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
    floor: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let remaining = from
        .lamports()
        .checked_sub(amount)
        .ok_or(CollateralError::InvalidState)?;
    require!(remaining >= floor, CollateralError::InvalidState);

    **from.try_borrow_mut_lamports()? = remaining;
    **to.try_borrow_mut_lamports()? = to
        .lamports()
        .checked_add(amount)
        .ok_or(CollateralError::ArithmeticOverflow)?;
    Ok(())
}
