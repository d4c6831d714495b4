//! Third One Free
//!
//! Buy two, get one free. The customer pays for every unit ordered and
//! receives one extra unit for each two paid, reported as a bonus quantity
//! rather than a price reduction.

use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::DiscountError,
    pricing::Charge,
    promotions::{PromotionError, line_subtotal},
};

/// Buy two, get one free
#[derive(Debug, Clone)]
pub struct ThirdOneFreePromotion {
    name: String,
}

impl ThirdOneFreePromotion {
    /// Create a new buy-two-get-one-free promotion.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Return the promotion name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the promotion
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Price `quantity` units at full price and count the items received.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the quantity is not positive or the arithmetic overflows.
    pub fn apply<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: i64,
    ) -> Result<Charge<'a>, PromotionError> {
        let subtotal = line_subtotal(unit_price, quantity)?;

        let received = quantity
            .checked_add(quantity / 2)
            .ok_or(DiscountError::Overflow)?;

        let subtotal = Money::from_minor(subtotal, unit_price.currency());

        Ok(Charge::with_bonus(subtotal, subtotal, received))
    }
}
