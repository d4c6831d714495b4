//! Fixtures
//!
//! Builds a catalog from YAML fixture sets. A set named `best_buy` is made of
//! `promotions/best_buy.yml` and `products/best_buy.yml` under the base path;
//! products reference promotions by their key in the promotions file.

use std::{fs, path::PathBuf, sync::Arc};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    fixtures::{products::ProductsFixture, promotions::PromotionsFixture},
    products::{Product, ProductError},
    promotions::{Promotion, PromotionError},
    store::{Store, StoreError},
};

pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// A product entry failed validation
    #[error("Invalid product: {0}")]
    Product(#[from] ProductError),

    /// A promotion entry failed validation
    #[error("Invalid promotion: {0}")]
    Promotion(#[from] PromotionError),

    /// Store creation error
    #[error("Failed to create store: {0}")]
    Store(#[from] StoreError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Promotions by fixture key, shared with the products that use them
    promotions: FxHashMap<String, Arc<Promotion>>,

    /// Products in file order
    products: Vec<Product<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            promotions: FxHashMap::default(),
            products: Vec::new(),
            currency: None,
        }
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a promotion is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for (key, promotion_fixture) in fixture.promotions {
            let promotion = Promotion::try_from(promotion_fixture)?;

            self.promotions.insert(key, Arc::new(promotion));
        }

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// Promotions referenced by the products must already be loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product is invalid, if
    /// a referenced promotion doesn't exist, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let promotion = product_fixture
                .promotion()
                .map(|key| self.promotion(key))
                .transpose()?;

            let mut product = product_fixture.try_into_product()?;
            let currency = product.price().currency();

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            if let Some(promotion) = promotion {
                product.set_promotion(promotion);
            }

            self.products.push(product);
        }

        Ok(self)
    }

    /// Load a complete fixture set (promotions and products with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_promotions(name)?.load_products(name)?;

        Ok(fixture)
    }

    /// Get a promotion by its fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::PromotionNotFound`] if no promotion has that key.
    pub fn promotion(&self, key: &str) -> Result<Arc<Promotion>, FixtureError> {
        self.promotions
            .get(key)
            .cloned()
            .ok_or_else(|| FixtureError::PromotionNotFound(key.to_string()))
    }

    /// Products loaded so far, in file order
    pub fn products(&self) -> &[Product<'static>] {
        &self.products
    }

    /// Currency of the loaded products
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a store holding the loaded products
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products have been loaded.
    pub fn into_store(self) -> Result<Store<'static>, FixtureError> {
        let currency = self.currency()?;

        Ok(Store::with_products(self.products, currency)?)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_set(dir: &Path, name: &str, promotions: &str, products: &str) -> TestResult {
        fs::create_dir_all(dir.join("promotions"))?;
        fs::create_dir_all(dir.join("products"))?;
        fs::write(dir.join("promotions").join(format!("{name}.yml")), promotions)?;
        fs::write(dir.join("products").join(format!("{name}.yml")), products)?;

        Ok(())
    }

    #[test]
    fn loads_products_with_shared_promotions() -> TestResult {
        let dir = TempDir::new()?;

        write_set(
            dir.path(),
            "shop",
            r#"
promotions:
  half:
    type: second_half_price
    name: "Second Half price!"
"#,
            r"
products:
  - type: stocked
    name: Laptop
    price: 1450 USD
    quantity: 10
    promotion: half
  - type: limited
    name: Shipping
    price: 10 USD
    quantity: 250
    maximum: 1
    promotion: half
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_promotions("shop")?.load_products("shop")?;

        let promotion = fixture.promotion("half")?;

        assert_eq!(fixture.products().len(), 2);
        assert_eq!(Arc::strong_count(&promotion), 4);

        let store = fixture.into_store()?;

        assert_eq!(store.total_quantity(), 260);

        Ok(())
    }

    #[test]
    fn unknown_promotion_reference_fails() -> TestResult {
        let dir = TempDir::new()?;

        write_set(
            dir.path(),
            "shop",
            "promotions: {}\n",
            r"
products:
  - type: stocked
    name: Laptop
    price: 1450 USD
    quantity: 10
    promotion: missing
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture
            .load_promotions("shop")
            .and_then(|fixture| fixture.load_products("shop"))
            .map(|_| ());

        assert!(matches!(result, Err(FixtureError::PromotionNotFound(key)) if key == "missing"));

        Ok(())
    }

    #[test]
    fn mixed_currencies_fail() -> TestResult {
        let dir = TempDir::new()?;

        write_set(
            dir.path(),
            "shop",
            "promotions: {}\n",
            r"
products:
  - type: stocked
    name: Laptop
    price: 1450 USD
    quantity: 10
  - type: non_stocked
    name: Licence
    price: 125 GBP
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture
            .load_promotions("shop")
            .and_then(|fixture| fixture.load_products("shop"))
            .map(|_| ());

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(expected, found))
            if expected == "USD" && found == "GBP"));

        Ok(())
    }

    #[test]
    fn invalid_product_fails() -> TestResult {
        let dir = TempDir::new()?;

        write_set(
            dir.path(),
            "shop",
            "promotions: {}\n",
            r#"
products:
  - type: stocked
    name: "123"
    price: 1450 USD
    quantity: 10
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture
            .load_promotions("shop")
            .and_then(|fixture| fixture.load_products("shop"))
            .map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::Product(ProductError::InvalidIdentity(_)))
        ));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_promotions("shop").map(|_| ()),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn empty_fixture_has_no_currency() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.into_store(), Err(FixtureError::NoCurrency)));
    }
}
