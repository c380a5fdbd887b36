//! Error codes for the ECP collateral program

use anchor_lang::prelude::*;

#[error_code]
pub enum CollateralError {
    // Authorization errors (6000-6099)
    #[msg("Caller is not authorized to perform this action")]
    Unauthorized,

    // Balance errors (6100-6199)
    #[msg("Insufficient funds for the requested amount")]
    InsufficientFunds,

    // Task lock errors (6200-6299)
    #[msg("Task already has a collateral lock")]
    TaskAlreadyLocked,

    #[msg("Task collateral is not locked")]
    TaskNotLocked,

    // Configuration errors (6300-6399)
    #[msg("Invalid parameter")]
    InvalidParameter,

    #[msg("Admin set is full")]
    AdminSetFull,

    // General errors (6400-6499)
    #[msg("Ledger state is inconsistent")]
    InvalidState,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
