//! Overflow-checked arithmetic

use selftest::{check, check_eq, test_case};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    #[error("{0} + {1} overflows a 64-bit integer")]
    AddOverflow(i64, i64),

    #[error("{0} * {1} overflows a 64-bit integer")]
    MulOverflow(i64, i64),
}

pub fn add(a: i64, b: i64) -> Result<i64, ArithError> {
    a.checked_add(b).ok_or(ArithError::AddOverflow(a, b))
}

pub fn mul(a: i64, b: i64) -> Result<i64, ArithError> {
    a.checked_mul(b).ok_or(ArithError::MulOverflow(a, b))
}

test_case!(add_small_numbers {
    check_eq!(add(1, 1), Ok(2));
    check_eq!(add(-7, 7), Ok(0));
});

test_case!(add_reports_overflow {
    check_eq!(add(i64::MAX, 1), Err(ArithError::AddOverflow(i64::MAX, 1)));
    check!(add(i64::MIN, -1).is_err());
});

test_case!(mul_identity_and_sign {
    check_eq!(mul(12, 1), Ok(12));
    check_eq!(mul(-3, 4), Ok(-12));
    check!(mul(i64::MAX, 2).is_err());
});
