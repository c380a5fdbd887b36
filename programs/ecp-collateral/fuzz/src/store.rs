//! Ledger store: identifiers and per-account balance bookkeeping
//!
//! The primitives here carry no authorization logic. The engine in
//! [`crate::ledger`] decides who may call them and validates amounts first;
//! the checks below still fail fast instead of clamping.

use std::fmt;

use crate::ledger::LedgerError;

/// Opaque 32-byte account identifier (a provider, admin or owner address)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 32]);

/// Opaque 32-byte task identifier (a task account address)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TaskId(pub [u8; 32]);

impl AccountId {
    /// Deterministic identifier for tests and scenarios
    pub const fn from_seed(seed: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xac;
        bytes[31] = seed;
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl TaskId {
    pub const fn from_seed(seed: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x7a;
        bytes[31] = seed;
        Self(bytes)
    }
}

fn write_short_hex(f: &mut fmt::Formatter<'_>, prefix: &str, bytes: &[u8; 32]) -> fmt::Result {
    write!(f, "{}", prefix)?;
    for byte in &bytes[..4] {
        write!(f, "{:02x}", byte)?;
    }
    write!(f, "..{:02x}", bytes[31])
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short_hex(f, "acct:", &self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short_hex(f, "task:", &self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Available and frozen lamports for one account.
///
/// Unseen accounts read as the zero record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceRecord {
    pub available: u64,
    pub frozen: u64,
}

impl BalanceRecord {
    pub fn total(&self) -> Result<u64, LedgerError> {
        self.available
            .checked_add(self.frozen)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0 && self.frozen == 0
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.available = self
            .available
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.available = self
            .available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        Ok(())
    }

    pub fn freeze(&mut self, amount: u64) -> Result<(), LedgerError> {
        let available = self
            .available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        let frozen = self
            .frozen
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.available = available;
        self.frozen = frozen;
        Ok(())
    }

    pub fn unfreeze(&mut self, amount: u64) -> Result<(), LedgerError> {
        let frozen = self
            .frozen
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        let available = self
            .available
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.available = available;
        self.frozen = frozen;
        Ok(())
    }
}
