//! Products
//!
//! A catalog entry and its stock rule. The stock rule is a closed set of
//! variants ([`ProductKind`]) checked by [`Product::buy`]:
//!
//! | Kind         | Rejects when                                            |
//! |--------------|---------------------------------------------------------|
//! | `Stocked`    | quantity > stock                                        |
//! | `NonStocked` | never (stock is unlimited)                              |
//! | `Limited`    | quantity > max per order, then quantity > stock         |

use std::{fmt, sync::Arc};

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::{
    pricing::{Charge, plain_amount},
    promotions::{Promotion, PromotionError, line_subtotal},
};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

const DEACTIVATED_SUFFIX: &str = " (deactivated)";

/// Errors raised while building, editing or selling a product.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// Name is empty, whitespace or purely numeric.
    #[error("product name must be a non-empty, non-numeric string, got {0:?}")]
    InvalidIdentity(String),

    /// Price is zero or negative.
    #[error("price must be greater than 0, got {0}")]
    InvalidPrice(String),

    /// Quantity is negative, or not positive where a purchase or restock needs one.
    #[error("invalid quantity {0}")]
    InvalidQuantity(i64),

    /// Not enough stock to fill the request.
    #[error("requested {requested} but only {available} in stock")]
    InsufficientStock {
        /// Units requested
        requested: i64,
        /// Units in stock
        available: i64,
    },

    /// Request exceeds the per-order cap of a limited product.
    #[error("requested {requested} but limited to {maximum} per order")]
    OrderLimitExceeded {
        /// Units requested
        requested: i64,
        /// Per-order cap
        maximum: i64,
    },

    /// A new price is in a different currency from the current one.
    #[error("price currency cannot change from {current} to {requested}")]
    CurrencyChange {
        /// ISO code of the current price
        current: &'static str,
        /// ISO code of the rejected price
        requested: &'static str,
    },

    /// Product has been taken off sale.
    #[error("product {0:?} is not active")]
    Inactive(String),

    /// Wrapped promotion error.
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

/// Stock rule of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// Ordinary stock; sales decrement the quantity
    Stocked,

    /// Unlimited supply; the quantity stays at zero and never runs out
    NonStocked,

    /// Ordinary stock with a cap on units per order
    Limited {
        /// Maximum units in a single purchase
        max_per_order: i64,
    },
}

impl ProductKind {
    fn tracks_stock(self) -> bool {
        !matches!(self, ProductKind::NonStocked)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    name: String,
    price: Money<'a, Currency>,
    quantity: i64,
    active: bool,
    kind: ProductKind,
    promotion: Option<Arc<Promotion>>,
}

impl<'a> Product<'a> {
    /// Create a stocked product.
    ///
    /// A product created with zero stock starts inactive.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidIdentity`]: the name is empty or numeric.
    /// - [`ProductError::InvalidPrice`]: the price is not positive.
    /// - [`ProductError::InvalidQuantity`]: the quantity is negative.
    pub fn new(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        quantity: i64,
    ) -> Result<Self, ProductError> {
        Self::build(name.into(), price, quantity, ProductKind::Stocked)
    }

    /// Create a product with unlimited supply.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidIdentity`]: the name is empty or numeric.
    /// - [`ProductError::InvalidPrice`]: the price is not positive.
    pub fn non_stocked(
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, ProductError> {
        Self::build(name.into(), price, 0, ProductKind::NonStocked)
    }

    /// Create a stocked product capped at `max_per_order` units per purchase.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidIdentity`]: the name is empty or numeric.
    /// - [`ProductError::InvalidPrice`]: the price is not positive.
    /// - [`ProductError::InvalidQuantity`]: the quantity is negative or the cap is not positive.
    pub fn limited(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        quantity: i64,
        max_per_order: i64,
    ) -> Result<Self, ProductError> {
        if max_per_order <= 0 {
            return Err(ProductError::InvalidQuantity(max_per_order));
        }

        Self::build(
            name.into(),
            price,
            quantity,
            ProductKind::Limited { max_per_order },
        )
    }

    fn build(
        name: String,
        price: Money<'a, Currency>,
        quantity: i64,
        kind: ProductKind,
    ) -> Result<Self, ProductError> {
        validate_name(&name)?;
        validate_price(&price)?;

        if quantity < 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }

        Ok(Self {
            name,
            price,
            quantity,
            active: !kind.tracks_stock() || quantity > 0,
            kind,
            promotion: None,
        })
    }

    /// Return the product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the name as listed, marked when the product is inactive
    pub fn display_name(&self) -> String {
        if self.active {
            self.name.clone()
        } else {
            format!("{}{DEACTIVATED_SUFFIX}", self.name)
        }
    }

    /// Return the unit price
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Change the unit price. The currency stays fixed for the life of the product.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidPrice`]: the price is not positive.
    /// - [`ProductError::CurrencyChange`]: the price is in another currency.
    pub fn set_price(&mut self, price: Money<'a, Currency>) -> Result<(), ProductError> {
        validate_price(&price)?;

        let current = self.price.currency();
        let requested = price.currency();

        if current != requested {
            return Err(ProductError::CurrencyChange {
                current: current.iso_alpha_code,
                requested: requested.iso_alpha_code,
            });
        }

        self.price = price;

        Ok(())
    }

    /// Return the remaining stock (always zero for non-stocked products)
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Overwrite the remaining stock. Setting it to zero deactivates the product.
    ///
    /// Non-stocked products ignore the new value. Use [`Product::restock`] to add
    /// to the current stock instead.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidQuantity`] if the quantity is negative.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), ProductError> {
        if quantity < 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }

        if !self.kind.tracks_stock() {
            return Ok(());
        }

        self.quantity = quantity;

        if quantity == 0 {
            self.active = false;
        }

        Ok(())
    }

    /// Add stock and put the product back on sale.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidQuantity`] if the quantity is not positive or the
    /// new stock level overflows.
    pub fn restock(&mut self, quantity: i64) -> Result<(), ProductError> {
        if quantity <= 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }

        if self.kind.tracks_stock() {
            self.quantity = self
                .quantity
                .checked_add(quantity)
                .ok_or(ProductError::InvalidQuantity(quantity))?;
        }

        self.active = true;

        Ok(())
    }

    /// Whether the product can be listed and bought
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Put the product back on sale.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InsufficientStock`] if a stocked product has nothing left.
    pub fn activate(&mut self) -> Result<(), ProductError> {
        if self.kind.tracks_stock() && self.quantity == 0 {
            return Err(ProductError::InsufficientStock {
                requested: 1,
                available: 0,
            });
        }

        self.active = true;

        Ok(())
    }

    /// Take the product off sale.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Return the stock rule
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Whether the product has unlimited supply
    pub fn is_non_stocked(&self) -> bool {
        self.kind == ProductKind::NonStocked
    }

    /// Return the per-order cap of a limited product
    pub fn max_per_order(&self) -> Option<i64> {
        match self.kind {
            ProductKind::Limited { max_per_order } => Some(max_per_order),
            ProductKind::Stocked | ProductKind::NonStocked => None,
        }
    }

    /// Return the attached promotion
    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_deref()
    }

    /// Attach a promotion, replacing any previous one.
    pub fn set_promotion(&mut self, promotion: Arc<Promotion>) {
        self.promotion = Some(promotion);
    }

    /// Detach the promotion, returning it.
    pub fn clear_promotion(&mut self) -> Option<Arc<Promotion>> {
        self.promotion.take()
    }

    /// Sell `quantity` units.
    ///
    /// Stock is only touched once the request has been validated and priced.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidQuantity`]: the quantity is not positive.
    /// - [`ProductError::OrderLimitExceeded`]: a limited product's cap is exceeded.
    /// - [`ProductError::InsufficientStock`]: not enough stock.
    /// - [`ProductError::Inactive`]: the product was taken off sale.
    /// - [`ProductError::Promotion`]: pricing overflowed.
    pub fn buy(&mut self, quantity: i64) -> Result<Charge<'a>, ProductError> {
        if quantity <= 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }

        self.check_stock(quantity)?;

        if !self.active {
            return Err(ProductError::Inactive(self.name.clone()));
        }

        let charge = match &self.promotion {
            Some(promotion) => promotion.apply_promotion(&self.price, quantity)?,
            None => Charge::full_price(Money::from_minor(
                line_subtotal(&self.price, quantity)?,
                self.price.currency(),
            )),
        };

        if self.kind.tracks_stock() {
            self.quantity -= quantity;

            if self.quantity == 0 {
                self.active = false;
            }
        }

        Ok(charge)
    }

    fn check_stock(&self, quantity: i64) -> Result<(), ProductError> {
        let available = self.quantity;

        match self.kind {
            ProductKind::NonStocked => Ok(()),
            ProductKind::Limited { max_per_order } if quantity > max_per_order => {
                Err(ProductError::OrderLimitExceeded {
                    requested: quantity,
                    maximum: max_per_order,
                })
            }
            ProductKind::Stocked | ProductKind::Limited { .. } if quantity > available => {
                Err(ProductError::InsufficientStock {
                    requested: quantity,
                    available,
                })
            }
            ProductKind::Stocked | ProductKind::Limited { .. } => Ok(()),
        }
    }

    /// Render the product as a catalog line, e.g.
    /// `MacBook Air M2, Price: 1450, Quantity: 100, Promotion: Second Half price!`
    pub fn show(&self) -> String {
        let stock = match self.kind {
            ProductKind::Stocked => self.quantity.to_string(),
            ProductKind::NonStocked => "Unlimited".to_string(),
            ProductKind::Limited { max_per_order } => {
                format!("Limited to {max_per_order} per order")
            }
        };

        format!(
            "{}, Price: {}, Quantity: {stock}, Promotion: {}",
            self.display_name(),
            plain_amount(&self.price),
            self.promotion().map_or("None", Promotion::name),
        )
    }
}

impl fmt::Display for Product<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.show())
    }
}

fn validate_name(name: &str) -> Result<(), ProductError> {
    let trimmed = name.trim();

    if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProductError::InvalidIdentity(name.to_string()));
    }

    Ok(())
}

fn validate_price(price: &Money<'_, Currency>) -> Result<(), ProductError> {
    if price.to_minor_units() <= 0 {
        return Err(ProductError::InvalidPrice(plain_amount(price)));
    }

    Ok(())
}
