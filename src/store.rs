//! Store
//!
//! The catalog aggregate. Products live in a [`SlotMap`] keyed by
//! [`ProductKey`]; a separate key list keeps catalog (display) order.
//!
//! A `Store` is not internally synchronised. Embedders that share one across
//! threads wrap the whole store in a single lock, so that `order`,
//! `add_product` and `remove_product` are one critical section.

use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    pricing::Charge,
    products::{Product, ProductError, ProductKey},
};

/// Errors raised by catalog edits and orders.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The product key is not in the catalog.
    #[error("product {0:?} not found")]
    ProductNotFound(ProductKey),

    /// A product's currency differs from the store currency (product, product currency, store currency).
    #[error("product {0:?} has currency {1}, but store has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// Two stores in different currencies cannot be merged (this store, other store).
    #[error("cannot merge a {1} store into a {0} store")]
    MergeCurrencyMismatch(&'static str, &'static str),

    /// A shopping list line failed. Earlier lines stay applied.
    #[error("order line {line} failed: {source}")]
    OrderLine {
        /// Zero-based index of the failing line
        line: usize,
        /// Why the purchase was refused
        #[source]
        source: ProductError,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Outcome of a successful order.
#[derive(Debug, Clone)]
pub struct OrderSummary<'a> {
    subtotal: Money<'a, Currency>,
    total: Money<'a, Currency>,
    items_received: i64,
    lines: SmallVec<[Charge<'a>; 8]>,
}

impl<'a> OrderSummary<'a> {
    /// Total before promotions
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total charged
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Items received through bundled-free promotions (zero when none applied)
    pub fn items_received(&self) -> i64 {
        self.items_received
    }

    /// Per-line charges, in shopping list order
    pub fn lines(&self) -> &[Charge<'a>] {
        &self.lines
    }

    /// Amount saved across the order.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }
}

/// Store
#[derive(Debug)]
pub struct Store<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    catalog: Vec<ProductKey>,
    currency: &'a Currency,
}

impl<'a> Store<'a> {
    /// Create an empty store trading in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        Store {
            products: SlotMap::with_key(),
            catalog: Vec::new(),
            currency,
        }
    }

    /// Create a store holding `products`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CurrencyMismatch`] if a product is priced in another currency.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'a Currency,
    ) -> Result<Self, StoreError> {
        let mut store = Store::new(currency);

        for product in products {
            store.add_product(product)?;
        }

        Ok(store)
    }

    /// Get the currency of the store.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Append a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_product(&mut self, product: Product<'a>) -> Result<ProductKey, StoreError> {
        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(StoreError::CurrencyMismatch(
                product.name().to_string(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let key = self.products.insert(product);
        self.catalog.push(key);

        Ok(key)
    }

    /// Remove a product from the catalog, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if the key is not in the catalog.
    pub fn remove_product(&mut self, key: ProductKey) -> Result<Product<'a>, StoreError> {
        let product = self
            .products
            .remove(key)
            .ok_or(StoreError::ProductNotFound(key))?;

        self.catalog.retain(|catalog_key| *catalog_key != key);

        Ok(product)
    }

    /// Whether the key belongs to this catalog.
    pub fn contains(&self, key: ProductKey) -> bool {
        self.products.contains_key(key)
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Get a product by key for editing.
    pub fn get_mut(&mut self, key: ProductKey) -> Option<&mut Product<'a>> {
        self.products.get_mut(key)
    }

    /// Number of products in the catalog, active or not.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Iterate over every product in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.catalog
            .iter()
            .filter_map(|key| self.products.get(*key).map(|product| (*key, product)))
    }

    /// Active products in catalog order.
    pub fn all_products(&self) -> Vec<(ProductKey, &Product<'a>)> {
        self.iter().filter(|(_, product)| product.is_active()).collect()
    }

    /// Units in stock across the catalog, saturating at `i64::MAX`.
    /// Non-stocked products count as zero.
    pub fn total_quantity(&self) -> i64 {
        self.iter()
            .fold(0, |total, (_, product)| total.saturating_add(product.quantity()))
    }

    /// Combine two catalogs into a new store: this store's products first, then
    /// `other`'s, each in catalog order. Products keep their stock, state and
    /// promotions but get new keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MergeCurrencyMismatch`] if the stores trade in different
    /// currencies.
    pub fn merge(self, other: Store<'a>) -> Result<Self, StoreError> {
        if self.currency != other.currency {
            return Err(StoreError::MergeCurrencyMismatch(
                self.currency.iso_alpha_code,
                other.currency.iso_alpha_code,
            ));
        }

        let currency = self.currency;

        Store::with_products(self.into_products().chain(other.into_products()), currency)
    }

    fn into_products(self) -> impl Iterator<Item = Product<'a>> {
        let Store {
            mut products,
            catalog,
            ..
        } = self;

        catalog.into_iter().filter_map(move |key| products.remove(key))
    }

    /// Buy each `(product, quantity)` line in order and total the charges.
    ///
    /// Lines are not merged. The first failing line aborts the order and lines
    /// bought before it are not rolled back.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ProductNotFound`]: a line names a product outside the catalog.
    /// - [`StoreError::OrderLine`]: a purchase was refused.
    /// - [`StoreError::Money`]: totals could not be added up.
    pub fn order(
        &mut self,
        shopping_list: &[(ProductKey, i64)],
    ) -> Result<OrderSummary<'a>, StoreError> {
        let mut subtotal = Money::from_minor(0, self.currency);
        let mut total = Money::from_minor(0, self.currency);
        let mut items_received: i64 = 0;
        let mut lines = SmallVec::new();

        for (line, &(key, quantity)) in shopping_list.iter().enumerate() {
            let product = self
                .products
                .get_mut(key)
                .ok_or(StoreError::ProductNotFound(key))?;

            let charge = product
                .buy(quantity)
                .map_err(|source| StoreError::OrderLine { line, source })?;

            subtotal = subtotal.add(charge.subtotal())?;
            total = total.add(charge.total())?;
            items_received = items_received.saturating_add(charge.bonus_quantity().unwrap_or(0));

            lines.push(charge);
        }

        Ok(OrderSummary {
            subtotal,
            total,
            items_received,
            lines,
        })
    }
}
