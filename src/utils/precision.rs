// src/utils/precision.rs
use crate::error::{EngineError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Rounds a fractional purchase size UP to whole shares.
/// Returns `Ok(0)` when the size is not positive.
/// Example: 12.2 -> 13, 0.0000001 -> 1
pub fn round_up_shares(raw: Decimal) -> Result<u64> {
    if raw <= Decimal::ZERO {
        return Ok(0);
    }
    raw.ceil().to_u64().ok_or(EngineError::Overflow)
}

/// Converts a boundary float into a decimal. `None` for NaN and infinities.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Parses scraped currency text: "$1,234.56" -> 1234.56
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// Parses a sign-bearing percent: "+4.10%" -> 4.10, "-1,234.5%" -> -1234.5
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Parses the first number in a share label: "1,250 Shares" -> 1250
pub fn parse_quantity(text: &str) -> Option<Decimal> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&number).ok()
}

pub fn checked_mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or(EngineError::Overflow)
}

pub fn checked_add(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or(EngineError::Overflow)
}

pub fn checked_sub(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or(EngineError::Overflow)
}

/// Callers guarantee a non-zero divisor; a zero divisor still maps to `Overflow`.
pub fn checked_div(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_div(rhs).ok_or(EngineError::Overflow)
}
