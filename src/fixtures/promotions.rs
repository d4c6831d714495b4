//! Promotion Fixtures

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{fixtures::FixtureError, promotions::Promotion};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion key -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionFixture {
    /// Flat percentage off
    PercentDiscount {
        /// Promotion name
        name: String,

        /// Discount, as "30%" or "0.3"
        percent: String,
    },

    /// Second unit at half price
    SecondHalfPrice {
        /// Promotion name
        name: String,
    },

    /// Buy two, get one free
    ThirdOneFree {
        /// Promotion name
        name: String,
    },
}

impl TryFrom<PromotionFixture> for Promotion {
    type Error = FixtureError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        let promotion = match fixture {
            PromotionFixture::PercentDiscount { name, percent } => {
                Promotion::percent_discount(name, parse_percentage(&percent)?)?
            }
            PromotionFixture::SecondHalfPrice { name } => Promotion::second_half_price(name),
            PromotionFixture::ThirdOneFree { name } => Promotion::third_one_free(name),
        };

        Ok(promotion)
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
