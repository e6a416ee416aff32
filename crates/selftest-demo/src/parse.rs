//! Operand parsing: decimal, `0x` hexadecimal and `0b` binary, with `_` separators

use selftest::{check, check_eq, test_case};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid operand '{input}': {reason}")]
pub struct ParseError {
    input: String,
    reason: &'static str,
}

pub fn operand(input: &str) -> Result<i64, ParseError> {
    let error = |reason| ParseError {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (radix, digits) = if let Some(hex) = unsigned.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = unsigned.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, unsigned)
    };

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(error("no digits"));
    }

    let magnitude = i64::from_str_radix(&digits, radix).map_err(|_| error("not a number"))?;
    Ok(if negative { -magnitude } else { magnitude })
}

test_case!(decimal_operands {
    check_eq!(operand("42"), Ok(42));
    check_eq!(operand(" -17 "), Ok(-17));
    check_eq!(operand("1_000"), Ok(1000));
});

test_case!(prefixed_operands {
    check_eq!(operand("0xff"), Ok(255));
    check_eq!(operand("0b1010"), Ok(10));
    check_eq!(operand("-0x10"), Ok(-16));
});

test_case!(rejects_garbage {
    check!(operand("").is_err());
    check!(operand("0x").is_err());
    check!(operand("12ab").is_err());
});
