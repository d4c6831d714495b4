//! Second Half Price
//!
//! Every second unit on the line costs half the unit price.

use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, half_of_minor, line_minor},
    pricing::Charge,
    promotions::{PromotionError, line_subtotal},
};

/// Second unit at half price
#[derive(Debug, Clone)]
pub struct SecondHalfPricePromotion {
    name: String,
}

impl SecondHalfPricePromotion {
    /// Create a new second-half-price promotion.
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

    /// Price `quantity` units, charging every second unit at half price.
    ///
    /// The half price is rounded per unit before it is multiplied out.
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
        let unit = unit_price.to_minor_units();

        let half_priced = quantity / 2;
        let full_priced = quantity - half_priced;

        let total = line_minor(unit, full_priced)?
            .checked_add(line_minor(half_of_minor(unit), half_priced)?)
            .ok_or(DiscountError::Overflow)?;

        Ok(Charge::new(
            Money::from_minor(subtotal, unit_price.currency()),
            Money::from_minor(total, unit_price.currency()),
        ))
    }
}
