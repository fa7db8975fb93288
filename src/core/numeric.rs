//! Parsing of user-entered quantity and price text.
//!
//! Quantity input is permissive and never fails. Price input accepts a comma as
//! the decimal separator; sign checks happen later, in batch validation.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a quantity field by keeping only its ASCII digits.
///
/// An input without digits yields `0`; values beyond `u32::MAX` saturate.
#[must_use]
pub fn parse_quantity(text: &str) -> u32 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0_u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(digit)
        })
}

/// Most significant digits a price may carry. Prices are stored as JSON
/// numbers (`f64`), which round-trip this many digits exactly.
pub const MAX_PRICE_DIGITS: u32 = 15;

/// Parses a price field, treating the first comma as the decimal separator.
///
/// Empty or whitespace-only input is zero. Negative values are returned as-is.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] when the normalized text is not a number or
/// has more than [`MAX_PRICE_DIGITS`] significant digits.
pub fn parse_price(text: &str) -> Result<Decimal> {
    let invalid = || Error::InvalidPrice {
        input: text.to_string(),
    };
    let normalized = text.replacen(',', ".", 1);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;
    if significant_digits(price) > MAX_PRICE_DIGITS {
        return Err(invalid());
    }
    Ok(price)
}

fn significant_digits(value: Decimal) -> u32 {
    value
        .normalize()
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |log| log + 1)
}
