//! Protocol parameters: base collateral unit and the two ratios

use crate::ledger::LedgerError;

pub const DEFAULT_COLLATERAL_RATIO: u64 = 5;
pub const DEFAULT_SLASH_RATIO: u64 = 2;

/// Bond per lock is `base_collateral * collateral_ratio`; penalty per slash
/// is `base_collateral * slash_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerParams {
    pub base_collateral: u64,
    pub collateral_ratio: u64,
    pub slash_ratio: u64,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            base_collateral: 0,
            collateral_ratio: DEFAULT_COLLATERAL_RATIO,
            slash_ratio: DEFAULT_SLASH_RATIO,
        }
    }
}

impl LedgerParams {
    pub fn with_base_collateral(base_collateral: u64) -> Self {
        Self {
            base_collateral,
            ..Default::default()
        }
    }

    /// Ratios positive, `slash_ratio <= collateral_ratio`, bond fits in u64.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.collateral_ratio == 0 || self.slash_ratio == 0 {
            return Err(LedgerError::InvalidParameter);
        }
        if self.slash_ratio > self.collateral_ratio {
            return Err(LedgerError::InvalidParameter);
        }
        self.required_collateral()?;
        Ok(())
    }

    pub fn required_collateral(&self) -> Result<u64, LedgerError> {
        self.base_collateral
            .checked_mul(self.collateral_ratio)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    pub fn slash_penalty(&self) -> Result<u64, LedgerError> {
        self.base_collateral
            .checked_mul(self.slash_ratio)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Returns validated params with the collateral ratio replaced.
    pub fn set_collateral_ratio(self, value: u64) -> Result<Self, LedgerError> {
        let next = Self {
            collateral_ratio: value,
            ..self
        };
        next.validate()?;
        Ok(next)
    }

    pub fn set_slash_ratio(self, value: u64) -> Result<Self, LedgerError> {
        let next = Self {
            slash_ratio: value,
            ..self
        };
        next.validate()?;
        Ok(next)
    }

    pub fn set_base_collateral(self, value: u64) -> Result<Self, LedgerError> {
        let next = Self {
            base_collateral: value,
            ..self
        };
        next.validate()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = LedgerParams::default();
        assert_eq!(params.collateral_ratio, 5);
        assert_eq!(params.slash_ratio, 2);
        assert_eq!(params.required_collateral(), Ok(0));
    }

    #[test]
    fn test_bond_and_penalty() {
        let params = LedgerParams::with_base_collateral(100_000_000);
        assert_eq!(params.required_collateral(), Ok(500_000_000));
        assert_eq!(params.slash_penalty(), Ok(200_000_000));
    }

    #[test]
    fn test_zero_ratios_rejected() {
        let params = LedgerParams::default();
        assert_eq!(params.set_collateral_ratio(0), Err(LedgerError::InvalidParameter));
        assert_eq!(params.set_slash_ratio(0), Err(LedgerError::InvalidParameter));
    }

    #[test]
    fn test_slash_ratio_bounded_by_collateral_ratio() {
        let params = LedgerParams::default();
        assert_eq!(params.set_slash_ratio(6), Err(LedgerError::InvalidParameter));
        assert_eq!(params.set_collateral_ratio(1), Err(LedgerError::InvalidParameter));
        assert_eq!(params.set_slash_ratio(5).map(|p| p.slash_ratio), Ok(5));
    }

    #[test]
    fn test_overflowing_base_rejected() {
        let params = LedgerParams::default();
        assert_eq!(
            params.set_base_collateral(u64::MAX / 2),
            Err(LedgerError::ArithmeticOverflow)
        );
    }
}
