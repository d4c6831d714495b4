//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductFixture {
    /// Ordinary stocked product
    Stocked {
        /// Product name
        name: String,

        /// Product price (e.g., "1450 USD")
        price: String,

        /// Units in stock
        quantity: i64,

        /// Promotion key
        promotion: Option<String>,
    },

    /// Product with unlimited supply
    NonStocked {
        /// Product name
        name: String,

        /// Product price (e.g., "125 USD")
        price: String,

        /// Promotion key
        promotion: Option<String>,
    },

    /// Stocked product capped per order
    Limited {
        /// Product name
        name: String,

        /// Product price (e.g., "10 USD")
        price: String,

        /// Units in stock
        quantity: i64,

        /// Maximum units per order
        maximum: i64,

        /// Promotion key
        promotion: Option<String>,
    },
}

impl ProductFixture {
    /// Key of the promotion attached to this product, if any
    pub fn promotion(&self) -> Option<&str> {
        match self {
            ProductFixture::Stocked { promotion, .. }
            | ProductFixture::NonStocked { promotion, .. }
            | ProductFixture::Limited { promotion, .. } => promotion.as_deref(),
        }
    }

    /// Convert to a `Product` without its promotion
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed or the product fails validation.
    pub fn try_into_product(self) -> Result<Product<'static>, FixtureError> {
        let product = match self {
            ProductFixture::Stocked {
                name,
                price,
                quantity,
                ..
            } => Product::new(name, parse_money(&price)?, quantity)?,
            ProductFixture::NonStocked { name, price, .. } => {
                Product::non_stocked(name, parse_money(&price)?)?
            }
            ProductFixture::Limited {
                name,
                price,
                quantity,
                maximum,
                ..
            } => Product::limited(name, parse_money(&price)?, quantity, maximum)?,
        };

        Ok(product)
    }
}

fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "14.50 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use crate::products::{ProductError, ProductKind};

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("14.50USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_whole_and_fractional_amounts() -> Result<(), FixtureError> {
        let (whole, usd) = parse_price("1450 USD")?;
        let (fraction, eur) = parse_price("2.50 EUR")?;

        assert_eq!(whole, 145_000);
        assert_eq!(usd, USD);
        assert_eq!(fraction, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn product_fixture_parses_each_kind() -> Result<(), FixtureError> {
        let yaml = r"
products:
  - type: stocked
    name: MacBook Air M2
    price: 1450 USD
    quantity: 100
    promotion: second_half_price
  - type: non_stocked
    name: Windows License
    price: 125 USD
  - type: limited
    name: Shipping
    price: 10 USD
    quantity: 250
    maximum: 1
";
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;
        let promotions: Vec<Option<&str>> =
            fixture.products.iter().map(ProductFixture::promotion).collect();

        assert_eq!(promotions, vec![Some("second_half_price"), None, None]);

        let kinds = fixture
            .products
            .into_iter()
            .map(|product| product.try_into_product().map(|product| product.kind()))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(
            kinds,
            vec![
                ProductKind::Stocked,
                ProductKind::NonStocked,
                ProductKind::Limited { max_per_order: 1 }
            ]
        );

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_missing_quantity() {
        let yaml = r"
type: stocked
name: MacBook Air M2
price: 1450 USD
";
        let result: Result<ProductFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }

    #[test]
    fn product_fixture_surfaces_validation_errors() {
        let fixture = ProductFixture::Stocked {
            name: "MacBook Air M2".to_string(),
            price: "0 USD".to_string(),
            quantity: 10,
            promotion: None,
        };

        assert!(matches!(
            fixture.try_into_product(),
            Err(FixtureError::Product(ProductError::InvalidPrice(_)))
        ));
    }
}
