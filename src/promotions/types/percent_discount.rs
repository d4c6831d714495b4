//! Percent Discount
//!
//! A flat percentage off the whole line (e.g. "30% off!").

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, is_valid_percentage, percent_of_minor},
    pricing::Charge,
    promotions::{PromotionError, line_subtotal},
};

/// A percentage discount applied to the line subtotal
#[derive(Debug, Clone)]
pub struct PercentDiscountPromotion {
    name: String,
    percent: Percentage,
}

impl PercentDiscountPromotion {
    /// Create a new percent discount promotion.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPercentage`] unless `percent` lies within `0%..=100%`.
    pub fn new(name: impl Into<String>, percent: Percentage) -> Result<Self, PromotionError> {
        if !is_valid_percentage(&percent) {
            return Err(PromotionError::InvalidPercentage);
        }

        Ok(Self {
            name: name.into(),
            percent,
        })
    }

    /// Return the promotion name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the promotion
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Return the discount percentage
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// Price `quantity` units at `unit_price`, less the discount.
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
        let discount = percent_of_minor(&self.percent, subtotal)?;

        let total = subtotal
            .checked_sub(discount)
            .ok_or(DiscountError::PercentConversion)?;

        Ok(Charge::new(
            Money::from_minor(subtotal, unit_price.currency()),
            Money::from_minor(0.max(total), unit_price.currency()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn thirty_percent_off_single_unit() -> TestResult {
        let promo = PercentDiscountPromotion::new("30% off!", Percentage::from(0.3))?;

        let charge = promo.apply(&Money::from_minor(12_500, USD), 1)?;

        assert_eq!(charge.subtotal(), Money::from_minor(12_500, USD));
        assert_eq!(charge.total(), Money::from_minor(8_750, USD));
        assert_eq!(charge.bonus_quantity(), None);

        Ok(())
    }

    #[test]
    fn discount_applies_to_whole_line() -> TestResult {
        let promo = PercentDiscountPromotion::new("20% off", Percentage::from(0.2))?;

        let charge = promo.apply(&Money::from_minor(999, USD), 3)?;

        // 2997 - 599.4 = 2397.6, rounded to 2398
        assert_eq!(charge.total(), Money::from_minor(2_398, USD));

        Ok(())
    }

    #[test]
    fn full_discount_is_free() -> TestResult {
        let promo = PercentDiscountPromotion::new("Free", Percentage::from(1.0))?;

        let charge = promo.apply(&Money::from_minor(500, USD), 2)?;

        assert_eq!(charge.total(), Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert!(matches!(
            PercentDiscountPromotion::new("Too much", Percentage::from(1.5)),
            Err(PromotionError::InvalidPercentage)
        ));
        assert!(matches!(
            PercentDiscountPromotion::new("Negative", Percentage::from(-0.25)),
            Err(PromotionError::InvalidPercentage)
        ));
    }

    #[test]
    fn rejects_non_positive_quantity() -> TestResult {
        let promo = PercentDiscountPromotion::new("30% off!", Percentage::from(0.3))?;

        assert!(matches!(
            promo.apply(&Money::from_minor(100, USD), 0),
            Err(PromotionError::InvalidQuantity(0))
        ));

        Ok(())
    }

    #[test]
    fn set_name_renames() -> TestResult {
        let mut promo = PercentDiscountPromotion::new("30% off!", Percentage::from(0.3))?;
        promo.set_name("Spring sale");

        assert_eq!(promo.name(), "Spring sale");
        assert_eq!(promo.percent(), Percentage::from(0.3));

        Ok(())
    }
}
