//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError},
    pricing::Charge,
    products::{Product, ProductError, ProductKey, ProductKind},
    promotions::{
        Promotion, PromotionError,
        types::{PercentDiscountPromotion, SecondHalfPricePromotion, ThirdOneFreePromotion},
    },
    store::{OrderSummary, Store, StoreError},
};
