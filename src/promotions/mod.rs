//! Promotions

use std::fmt;

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{DiscountError, line_minor},
    pricing::Charge,
    promotions::types::{
        PercentDiscountPromotion, SecondHalfPricePromotion, ThirdOneFreePromotion,
    },
};

pub mod types;

/// Errors raised while building or applying a promotion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// Percentage outside `0%..=100%`.
    #[error("percentage must be between 0% and 100%")]
    InvalidPercentage,

    /// Quantity passed to a promotion was not positive.
    #[error("quantity must be greater than 0, got {0}")]
    InvalidQuantity(i64),

    /// Wrapped discount arithmetic error.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Promotion enum
#[derive(Debug, Clone)]
pub enum Promotion {
    /// Flat percentage off the line
    PercentDiscount(PercentDiscountPromotion),

    /// Every second unit at half price
    SecondHalfPrice(SecondHalfPricePromotion),

    /// Buy two, get one free
    ThirdOneFree(ThirdOneFreePromotion),
}

impl Promotion {
    /// Create a percent discount promotion.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPercentage`] unless `percent` lies within `0%..=100%`.
    pub fn percent_discount(
        name: impl Into<String>,
        percent: Percentage,
    ) -> Result<Self, PromotionError> {
        Ok(Promotion::PercentDiscount(PercentDiscountPromotion::new(
            name, percent,
        )?))
    }

    /// Create a second-half-price promotion.
    pub fn second_half_price(name: impl Into<String>) -> Self {
        Promotion::SecondHalfPrice(SecondHalfPricePromotion::new(name))
    }

    /// Create a buy-two-get-one-free promotion.
    pub fn third_one_free(name: impl Into<String>) -> Self {
        Promotion::ThirdOneFree(ThirdOneFreePromotion::new(name))
    }

    /// Return the promotion name.
    pub fn name(&self) -> &str {
        match self {
            Promotion::PercentDiscount(percent_discount) => percent_discount.name(),
            Promotion::SecondHalfPrice(second_half_price) => second_half_price.name(),
            Promotion::ThirdOneFree(third_one_free) => third_one_free.name(),
        }
    }

    /// Rename the promotion.
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Promotion::PercentDiscount(percent_discount) => percent_discount.set_name(name),
            Promotion::SecondHalfPrice(second_half_price) => second_half_price.set_name(name),
            Promotion::ThirdOneFree(third_one_free) => third_one_free.set_name(name),
        }
    }

    /// Price `quantity` units at `unit_price` under this promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the quantity is not positive or the arithmetic overflows.
    pub fn apply_promotion<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: i64,
    ) -> Result<Charge<'a>, PromotionError> {
        match self {
            Promotion::PercentDiscount(percent_discount) => {
                percent_discount.apply(unit_price, quantity)
            }
            Promotion::SecondHalfPrice(second_half_price) => {
                second_half_price.apply(unit_price, quantity)
            }
            Promotion::ThirdOneFree(third_one_free) => third_one_free.apply(unit_price, quantity),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate `quantity` and return the line subtotal in minor units.
pub(crate) fn line_subtotal(
    unit_price: &Money<'_, Currency>,
    quantity: i64,
) -> Result<i64, PromotionError> {
    if quantity <= 0 {
        return Err(PromotionError::InvalidQuantity(quantity));
    }

    Ok(line_minor(unit_price.to_minor_units(), quantity)?)
}
