//! Discount utilities
//!
//! Minor-unit arithmetic shared by the promotion types. Every helper works on
//! `i64` minor units (cents, pence) and rounds fractional results with
//! [`RoundingStrategy::MidpointAwayFromZero`].

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Multiplying a price by a quantity overflowed the minor unit range.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// represented as `i64` minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Half of a minor unit amount, with an odd remainder rounded away from zero.
pub fn half_of_minor(minor: i64) -> i64 {
    minor / 2 + minor % 2
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the product does not fit in `i64` minor units.
pub fn line_minor(unit_minor: i64, quantity: i64) -> Result<i64, DiscountError> {
    unit_minor
        .checked_mul(quantity)
        .ok_or(DiscountError::Overflow)
}

/// Whether a percentage lies within `0%..=100%`.
pub fn is_valid_percentage(percent: &Percentage) -> bool {
    let value = (*percent) * Decimal::ONE;

    value >= Decimal::ZERO && value <= Decimal::ONE
}
