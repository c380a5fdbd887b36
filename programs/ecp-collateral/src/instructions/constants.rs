//! Shared constants for instruction handlers

/// PDA seed for the global [`CollateralConfig`](crate::state::CollateralConfig)
pub const CONFIG_SEED: &[u8] = b"collateral_config";

/// PDA seed prefix for per-provider [`CollateralBalance`](crate::state::CollateralBalance)
pub const BALANCE_SEED: &[u8] = b"balance";

/// PDA seed prefix for per-task [`TaskLock`](crate::state::TaskLock)
pub const TASK_LOCK_SEED: &[u8] = b"task_lock";
