//! Events emitted by the ECP collateral program
//!
//! Indexers and the task coordinator follow these to mirror balances and
//! lock status off-chain.

use anchor_lang::prelude::*;

/// Emitted once when the collateral configuration is created
#[event]
pub struct CollateralInitialized {
    pub owner: Pubkey,
    pub base_collateral: u64,
    pub collateral_ratio: u64,
    pub slash_ratio: u64,
    pub timestamp: i64,
}

#[event]
pub struct AdminAdded {
    pub admin: Pubkey,
    pub admin_count: u8,
    pub timestamp: i64,
}

#[event]
pub struct AdminRemoved {
    pub admin: Pubkey,
    pub admin_count: u8,
    pub timestamp: i64,
}

#[event]
pub struct CollateralRatioUpdated {
    pub old_ratio: u64,
    pub new_ratio: u64,
    pub timestamp: i64,
}

#[event]
pub struct SlashRatioUpdated {
    pub old_ratio: u64,
    pub new_ratio: u64,
    pub timestamp: i64,
}

#[event]
pub struct BaseCollateralUpdated {
    pub old_base_collateral: u64,
    pub new_base_collateral: u64,
    pub timestamp: i64,
}

/// Emitted when lamports are deposited to a provider balance
#[event]
pub struct CollateralDeposited {
    pub depositor: Pubkey,
    pub account: Pubkey,
    pub amount: u64,
    pub available: u64,
    pub timestamp: i64,
}

/// Emitted when a provider withdraws available collateral
#[event]
pub struct CollateralWithdrawn {
    pub account: Pubkey,
    pub amount: u64,
    pub available: u64,
    pub timestamp: i64,
}

/// Emitted when an admin bonds collateral to a task
#[event]
pub struct CollateralLocked {
    pub task_id: Pubkey,
    pub account: Pubkey,
    pub collateral: u64,
    pub available: u64,
    pub frozen: u64,
    pub locked_by: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a task bond is released in full
#[event]
pub struct CollateralUnlocked {
    pub task_id: Pubkey,
    pub account: Pubkey,
    pub collateral: u64,
    pub available: u64,
    pub frozen: u64,
    pub unlocked_by: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a task bond is slashed
#[event]
pub struct CollateralSlashed {
    pub task_id: Pubkey,
    pub account: Pubkey,
    pub collateral: u64,
    pub penalty: u64,
    pub returned: u64,
    pub slashed_funds: u64,
    pub slashed_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct SlashedFundsWithdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    pub remaining: u64,
    pub timestamp: i64,
}
