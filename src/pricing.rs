//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};

/// The price of one order line, as produced by a product sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge<'a> {
    /// Unit price times quantity, before any promotion
    subtotal: Money<'a, Currency>,

    /// Amount actually charged
    total: Money<'a, Currency>,

    /// Items received, when a promotion hands out extra units for free
    bonus_quantity: Option<i64>,
}

impl<'a> Charge<'a> {
    /// Create a charge with no promotional bonus.
    pub fn new(subtotal: Money<'a, Currency>, total: Money<'a, Currency>) -> Self {
        Self {
            subtotal,
            total,
            bonus_quantity: None,
        }
    }

    /// Create a charge that also reports the number of items received.
    pub fn with_bonus(
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        bonus_quantity: i64,
    ) -> Self {
        Self {
            subtotal,
            total,
            bonus_quantity: Some(bonus_quantity),
        }
    }

    /// A charge at full price.
    pub fn full_price(subtotal: Money<'a, Currency>) -> Self {
        Self::new(subtotal, subtotal)
    }

    /// Unit price times quantity, before any promotion
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount charged
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Items received under a bundled-free promotion, if any
    pub fn bonus_quantity(&self) -> Option<i64> {
        self.bonus_quantity
    }

    /// Amount saved by the promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings relative to the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }
}

/// Render a money amount as a bare decimal (`1450`, `87.5`), without symbol or grouping.
pub fn plain_amount(money: &Money<'_, Currency>) -> String {
    money.amount().normalize().to_string()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn full_price_has_no_savings_or_bonus() -> TestResult {
        let charge = Charge::full_price(Money::from_minor(300, USD));

        assert_eq!(charge.total(), Money::from_minor(300, USD));
        assert_eq!(charge.savings()?, Money::from_minor(0, USD));
        assert_eq!(charge.bonus_quantity(), None);

        Ok(())
    }

    #[test]
    fn savings_is_subtotal_minus_total() -> TestResult {
        let charge = Charge::new(Money::from_minor(12_500, USD), Money::from_minor(8_750, USD));

        assert_eq!(charge.savings()?, Money::from_minor(3_750, USD));
        assert_eq!(charge.savings_percent()?, Percentage::from(Decimal::new(3, 1)));

        Ok(())
    }

    #[test]
    fn savings_percent_of_zero_subtotal_is_zero() -> TestResult {
        let charge = Charge::full_price(Money::from_minor(0, USD));

        assert_eq!(charge.savings_percent()?, Percentage::from(0.0));

        Ok(())
    }

    #[test]
    fn savings_errors_on_currency_mismatch() {
        let charge = Charge::new(Money::from_minor(300, GBP), Money::from_minor(250, USD));

        assert!(charge.savings().is_err());
    }

    #[test]
    fn with_bonus_keeps_bonus_quantity() {
        let charge = Charge::with_bonus(
            Money::from_minor(150_000, USD),
            Money::from_minor(150_000, USD),
            9,
        );

        assert_eq!(charge.bonus_quantity(), Some(9));
    }

    #[test]
    fn plain_amount_drops_trailing_zeros() {
        assert_eq!(plain_amount(&Money::from_minor(145_000, USD)), "1450");
        assert_eq!(plain_amount(&Money::from_minor(8_750, USD)), "87.5");
        assert_eq!(plain_amount(&Money::from_minor(999, USD)), "9.99");
    }
}
