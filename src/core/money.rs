//! Monetary input parsing.
//!
//! Amounts reach the service as JSON numbers or as numeric strings. Both are
//! accepted; anything else (missing, empty, non-numeric, NaN, infinite) is a
//! validation failure and is never coerced to zero.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// A monetary amount as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    /// A JSON number
    Number(f64),
    /// A numeric string such as `"1500.50"`
    Text(String),
}

impl From<f64> for MoneyInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MoneyInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Parses an optional amount, rejecting missing and non-finite values.
pub fn parse_amount(input: Option<&MoneyInput>, field: &str) -> Result<f64> {
    let amount = match input {
        None => return Err(Error::validation(format!("{field} is required"))),
        Some(MoneyInput::Number(n)) => *n,
        Some(MoneyInput::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(Error::validation(format!("{field} is required")));
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| Error::validation(format!("{field} must be a valid number")))?
        }
    };

    if !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Parses an amount that must be zero or more (opening float, counted cash).
pub fn parse_non_negative(input: Option<&MoneyInput>, field: &str) -> Result<f64> {
    let amount = parse_amount(input, field)?;
    if amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Parses an amount that must be strictly positive (drops, pickups).
pub fn parse_positive(input: Option<&MoneyInput>, field: &str) -> Result<f64> {
    let amount = parse_amount(input, field)?;
    if amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Checks an already-typed amount the same way [`parse_amount`] does.
pub fn ensure_finite(amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Rounds to whole cents so sums of binary floats compare cleanly.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Formats an amount with two decimals and an explicit sign, e.g. `"-10.00"`.
#[must_use]
pub fn format_signed(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{amount:.2}")
    } else {
        format!("-{:.2}", amount.abs())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_number_and_string() {
        assert_eq!(parse_amount(Some(&MoneyInput::from(12.5)), "amount").unwrap(), 12.5);
        assert_eq!(
            parse_amount(Some(&MoneyInput::from(" 1500.75 ")), "amount").unwrap(),
            1500.75
        );
    }

    #[test]
    fn test_missing_amount_is_validation_error() {
        let err = parse_amount(None, "openingAmount").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: openingAmount is required");

        let err = parse_amount(Some(&MoneyInput::from("   ")), "amount").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_numeric_is_not_coerced_to_zero() {
        let err = parse_amount(Some(&MoneyInput::from("abc")), "amount").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_nan_and_infinity_rejected() {
        let err = parse_amount(Some(&MoneyInput::from("NaN")), "amount").unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));
        let err = parse_amount(Some(&MoneyInput::from(f64::INFINITY)), "amount").unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));
    }

    #[test]
    fn test_sign_rules() {
        assert_eq!(parse_non_negative(Some(&MoneyInput::from(0.0)), "a").unwrap(), 0.0);
        assert!(parse_non_negative(Some(&MoneyInput::from(-1.0)), "a").is_err());
        assert!(parse_positive(Some(&MoneyInput::from(0.0)), "a").is_err());
        assert_eq!(parse_positive(Some(&MoneyInput::from("0.05")), "a").unwrap(), 0.05);
    }

    #[test]
    fn test_untagged_deserialization() {
        let n: MoneyInput = serde_json::from_str("200").unwrap();
        assert_eq!(n, MoneyInput::Number(200.0));
        let s: MoneyInput = serde_json::from_str("\"200.50\"").unwrap();
        assert_eq!(s, MoneyInput::Text("200.50".to_string()));
    }

    #[test]
    fn test_round_cents_and_format() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(format_signed(-10.0), "-10.00");
        assert_eq!(format_signed(2.5), "+2.50");
    }
}
