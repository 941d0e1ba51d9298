//! # Unit Conversion
//!
//! Token amounts travel on-chain as integers in base units: a token with
//! `decimals = 6` represents `1.5` as `1_500_000`. Users type decimals.
//! This module converts between the two without ever touching floating
//! point, so `"0.1"` means exactly one tenth and not 0.1000000000000000055.
//!
//! [`format_units`] always keeps at least one fractional digit (`"1.0"`),
//! which is the form wallets and explorers print.

use alloy_primitives::U256;
use thiserror::Error;

/// Largest decimals value whose scale factor `10^decimals` fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// Errors from parsing or validating a human-entered amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    /// Nothing to parse.
    #[error("amount is empty")]
    Empty,

    /// The text is not a plain decimal number.
    #[error("invalid amount {0:?}: expected digits with an optional decimal point")]
    InvalidNumber(String),

    /// More significant fractional digits than the token supports.
    #[error("too many decimal places: {found} given, token supports {decimals}")]
    TooManyDecimals {
        /// Significant fractional digits in the input.
        found: usize,
        /// The token's decimals.
        decimals: u8,
    },

    /// The scaled value does not fit in 256 bits.
    #[error("amount overflows 256 bits")]
    Overflow,

    /// Decimals beyond what a `U256` scale factor can represent.
    #[error("unsupported decimals: {0}")]
    UnsupportedDecimals(u8),
}

/// Returns `10^decimals` as a `U256`.
pub fn scale_factor(decimals: u8) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

/// Splits a decimal string into validated integer and fractional digit runs.
fn split_decimal(text: &str) -> Result<(&str, &str), UnitsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !all_digits(int_part)
        || !all_digits(frac_part)
    {
        return Err(UnitsError::InvalidNumber(trimmed.to_string()));
    }

    Ok((int_part, frac_part))
}

/// Accumulates a run of ASCII digits into `acc`, failing on overflow.
fn push_digits(mut acc: U256, digits: &str) -> Result<U256, UnitsError> {
    let ten = U256::from(10u8);
    for b in digits.bytes() {
        acc = acc
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(b - b'0')))
            .ok_or(UnitsError::Overflow)?;
    }
    Ok(acc)
}

/// Converts a human decimal string into base units.
///
/// `"1.5"` with `decimals = 18` becomes `1_500_000_000_000_000_000`.
/// Trailing fractional zeros beyond `decimals` are tolerated (`"1.50"` with
/// `decimals = 1`); any other excess precision is rejected rather than
/// silently truncated.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let (int_part, frac_part) = split_decimal(text)?;
    let scale = scale_factor(decimals)?;

    let significant = frac_part.trim_end_matches('0');
    if significant.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            found: significant.len(),
            decimals,
        });
    }

    let whole = push_digits(U256::ZERO, int_part)?
        .checked_mul(scale)
        .ok_or(UnitsError::Overflow)?;

    // Right-pad the fraction to exactly `decimals` digits.
    let padding = decimals as usize - significant.len();
    let mut fraction = push_digits(U256::ZERO, significant)?;
    if padding > 0 {
        fraction = fraction
            .checked_mul(scale_factor(padding as u8)?)
            .ok_or(UnitsError::Overflow)?;
    }

    whole.checked_add(fraction).ok_or(UnitsError::Overflow)
}

/// Formats base units as a decimal string with `decimals` places.
///
/// Trailing zeros are trimmed but one fractional digit always remains, so
/// whole amounts read `"2.0"`. With `decimals = 0` the integer is printed
/// as is.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let digits = value.to_string();
    let width = decimals as usize;
    let padded = if digits.len() <= width {
        format!("{}{}", "0".repeat(width + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - width);
    let frac_trimmed = frac_part.trim_end_matches('0');
    let frac_display = if frac_trimmed.is_empty() {
        "0"
    } else {
        frac_trimmed
    };

    format!("{int_part}.{frac_display}")
}

/// Checks that a user-entered amount is a positive decimal number before
/// anything is sent to the chain. Precision against the token's decimals
/// is checked later by [`parse_units`], once decimals are known.
pub fn validate_amount(text: &str) -> Result<(), UnitsError> {
    let (int_part, frac_part) = split_decimal(text)?;
    let is_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
    if is_zero {
        return Err(UnitsError::InvalidNumber(text.trim().to_string()));
    }
    Ok(())
}
