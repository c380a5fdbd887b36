//! In-memory collateral ledger and property-based fuzz testing for the ECP
//! collateral program
//!
//! [`SimulatedLedger`] mirrors the on-chain escrow engine without the Solana
//! runtime, so independent ledger instances can be driven side by side and
//! checked against the ledger invariants.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! FUZZ_ITERATIONS=1000 RUST_LOG=debug cargo run --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod ledger;
pub mod params;
pub mod roles;
pub mod scenarios;
pub mod store;

pub use arbitrary::*;
pub use invariants::*;
pub use ledger::*;
pub use params::*;
pub use roles::*;
pub use scenarios::*;
pub use store::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/deposit_withdraw.rs"]
mod deposit_withdraw_tests;

#[cfg(test)]
#[path = "../fuzz_targets/lock_lifecycle.rs"]
mod lock_lifecycle_tests;

#[cfg(test)]
#[path = "../fuzz_targets/slash_collateral.rs"]
mod slash_collateral_tests;

#[cfg(test)]
#[path = "../fuzz_targets/access_control.rs"]
mod access_control_tests;

#[cfg(test)]
#[path = "../fuzz_targets/action_sequence.rs"]
mod action_sequence_tests;

#[cfg(test)]
#[path = "../fuzz_targets/concurrency.rs"]
mod concurrency_tests;
