//! Instruction handlers for the ECP collateral program

pub mod constants;
pub mod lamport_transfer;
pub mod lock_helpers;
pub mod settlement_helpers;

pub mod deposit;
pub mod initialize;
pub mod lock_collateral;
pub mod manage_admins;
pub mod slash_collateral;
pub mod unlock_collateral;
pub mod update_parameters;
pub mod withdraw;
pub mod withdraw_slashed_funds;

#[allow(ambiguous_glob_reexports)]
pub use deposit::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use lock_collateral::*;
pub use manage_admins::*;
#[allow(ambiguous_glob_reexports)]
pub use slash_collateral::*;
#[allow(ambiguous_glob_reexports)]
pub use unlock_collateral::*;
pub use update_parameters::*;
#[allow(ambiguous_glob_reexports)]
pub use withdraw::*;
#[allow(ambiguous_glob_reexports)]
pub use withdraw_slashed_funds::*;
