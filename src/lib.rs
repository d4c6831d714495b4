//! Storefront
//!
//! An in-memory retail ordering engine: a catalog of stocked, unlimited and
//! per-order-capped products, shared pricing promotions, and a store that
//! sequences multi-item orders against them.

pub mod discounts;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod store;
