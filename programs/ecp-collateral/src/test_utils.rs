//! Shared assertions for unit tests

use anchor_lang::error::Error;
use anchor_lang::prelude::Result;

use crate::errors::CollateralError;

/// Asserts that `result` failed with the given program error code.
pub fn assert_collateral_err<T: std::fmt::Debug>(result: Result<T>, expected: CollateralError) {
    let expected_code = u32::from(expected);
    match result {
        Err(Error::AnchorError(err)) => assert_eq!(
            err.error_code_number, expected_code,
            "expected {}, got {}",
            expected, err.error_msg
        ),
        other => panic!("expected {}, got {:?}", expected, other),
    }
}
