//! Validation of amounts typed by a user.
//!
//! The store itself takes `u64` amounts and never re-checks them. Form
//! input arrives as text, so this module turns it into an amount and
//! reports everything wrong with it at once instead of stopping at the
//! first problem. Accumulation uses Stillwater's `Validation`.
//!
//! # Example
//!
//! ```rust
//! use atm_sim::validation::{parse_amount, AmountViolation};
//!
//! assert_eq!(parse_amount(" 150000 "), Ok(150_000));
//!
//! let errors = parse_amount("-2.5").unwrap_err();
//! assert!(errors.contains(&AmountViolation::Negative));
//! assert!(errors.contains(&AmountViolation::Fractional));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// 2^64, exactly representable as `f64` (unlike `u64::MAX`).
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Reasons an amount input is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AmountViolation {
    #[error("Amount is required")]
    Missing,

    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    #[error("Amount must be finite")]
    NotFinite,

    #[error("Amount cannot be negative")]
    Negative,

    #[error("Amount must be a whole number of units")]
    Fractional,

    #[error("Amount exceeds the largest supported value")]
    TooLarge,
}

/// Validate `input`, accumulating every violation that applies.
///
/// Decimal and exponent forms are parsed exactly, so an accepted amount is
/// always the value that was typed.
pub fn validate_amount(input: &str) -> Validation<u64, NonEmptyVec<AmountViolation>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Validation::fail(AmountViolation::Missing);
    }

    if let Ok(amount) = trimmed.parse::<u64>() {
        return Validation::success(amount);
    }

    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => validate_decimal(value),
        Err(_) => validate_float(trimmed),
    }
}

fn validate_decimal(value: Decimal) -> Validation<u64, NonEmptyVec<AmountViolation>> {
    let negative = value.is_sign_negative() && !value.is_zero();
    let whole = value.trunc().abs().to_u64();

    let checks = vec![
        check(!negative, AmountViolation::Negative),
        check(value.fract().is_zero(), AmountViolation::Fractional),
        check(negative || whole.is_some(), AmountViolation::TooLarge),
    ];

    // Only whole, non-negative, in-range values get here without failing.
    Validation::all_vec(checks).map(|_| whole.unwrap_or_default())
}

/// Classify input outside the decimal range: infinities, NaN and
/// magnitudes too large or too small to hold exactly.
fn validate_float(input: &str) -> Validation<u64, NonEmptyVec<AmountViolation>> {
    let Ok(value) = input.parse::<f64>() else {
        return Validation::fail(AmountViolation::NotANumber {
            input: input.to_string(),
        });
    };

    let checks = vec![
        check(value.is_finite(), AmountViolation::NotFinite),
        check(value.is_nan() || value >= 0.0, AmountViolation::Negative),
        check(
            !value.is_finite() || value.fract() == 0.0,
            AmountViolation::Fractional,
        ),
        check(
            !value.is_finite() || value < U64_LIMIT,
            AmountViolation::TooLarge,
        ),
    ];

    Validation::all_vec(checks).map(|_| value as u64)
}

/// Validate `input`, returning the amount or every violation found.
pub fn parse_amount(input: &str) -> Result<u64, Vec<AmountViolation>> {
    match validate_amount(input) {
        Validation::Success(amount) => Ok(amount),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

fn check(ok: bool, violation: AmountViolation) -> Validation<(), NonEmptyVec<AmountViolation>> {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}
