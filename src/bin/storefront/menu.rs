//! Store menu
//!
//! Reads choices line by line and writes prompts and results to any
//! [`Write`] sink, so the whole conversation can run against in-memory buffers.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use storefront::{
    pricing::{Charge, plain_amount},
    products::{ProductError, ProductKey},
    store::{Store, StoreError},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::{debug, info, warn};

const MENU: &str = "
    Store Menu
    ----------
1. List all products in store
2. Show total amount in store
3. Make an order
4. Quit";

const RULE: &str = "-------------------------------";

/// Errors that end the menu loop.
#[derive(Debug, Error)]
pub(crate) enum MenuError {
    /// Reading input or writing output failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Receipt totals could not be added up
    #[error(transparent)]
    Money(#[from] MoneyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    ListProducts,
    ShowTotal,
    Order,
    Quit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Self::ListProducts),
            "2" => Some(Self::ShowTotal),
            "3" => Some(Self::Order),
            "4" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// One accepted line of an ordering session.
#[derive(Debug)]
struct ReceiptLine<'a> {
    name: String,
    quantity: i64,
    charge: Charge<'a>,
}

/// Interactive menu over a store.
pub(crate) struct Menu<'s, 'a, R, W> {
    store: &'s mut Store<'a>,
    input: R,
    output: W,
}

impl<'s, 'a, R: BufRead, W: Write> Menu<'s, 'a, R, W> {
    pub(crate) fn new(store: &'s mut Store<'a>, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run until the customer quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    pub(crate) fn run(&mut self) -> Result<(), MenuError> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let Some(answer) = self.prompt("please choose a number: ")? else {
                break;
            };

            match Choice::parse(&answer) {
                Some(Choice::ListProducts) => {
                    self.list_products()?;
                }
                Some(Choice::ShowTotal) => self.show_total()?,
                Some(Choice::Order) => self.make_order()?,
                Some(Choice::Quit) => break,
                None => {
                    debug!(choice = %answer, "rejected menu choice");
                    writeln!(self.output, "Error with your choice '{answer}'. Try again!")?;
                }
            }
        }

        writeln!(self.output, "Thanks for shopping! Bye!")?;

        Ok(())
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>, MenuError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    /// Print the active products, numbered from 1, and return their keys in that order.
    fn list_products(&mut self) -> Result<Vec<ProductKey>, MenuError> {
        let products = self.store.all_products();

        writeln!(self.output, "{RULE}")?;

        for (number, (_, product)) in (1..).zip(&products) {
            writeln!(self.output, "{number}. {}", product.show())?;
        }

        writeln!(self.output, "{RULE}")?;

        Ok(products.into_iter().map(|(key, _)| key).collect())
    }

    fn show_total(&mut self) -> Result<(), MenuError> {
        writeln!(self.output, "{RULE}")?;
        writeln!(
            self.output,
            " Total of {} items in store",
            self.store.total_quantity()
        )?;
        writeln!(self.output, "{RULE}")?;

        Ok(())
    }

    fn make_order(&mut self) -> Result<(), MenuError> {
        let catalog = self.list_products()?;
        let mut receipt: SmallVec<[ReceiptLine<'a>; 8]> = SmallVec::new();

        writeln!(self.output, "When you finish your order, enter empty text.")?;

        loop {
            let Some(number) = self.prompt("Which product # do you want? ")? else {
                break;
            };
            let Some(amount) = self.prompt("What amount do you want? ")? else {
                break;
            };

            if number.is_empty() && amount.is_empty() {
                break;
            }

            let Some((key, quantity)) = parse_order_line(&catalog, &number, &amount) else {
                writeln!(self.output, "Error adding product. Try again!\n")?;
                continue;
            };

            match self.store.order(&[(key, quantity)]) {
                Ok(summary) => {
                    info!(
                        product = %number,
                        quantity,
                        total = %plain_amount(&summary.total()),
                        "order line accepted"
                    );

                    writeln!(self.output, "Product added to list.")?;

                    if summary.items_received() == 0 {
                        writeln!(
                            self.output,
                            "The total price of the order is ${}\n",
                            plain_amount(&summary.total())
                        )?;
                    } else {
                        writeln!(
                            self.output,
                            "The total price of the order is ${} and total is {}\n",
                            plain_amount(&summary.total()),
                            summary.items_received()
                        )?;
                    }

                    let name = self
                        .store
                        .get(key)
                        .map(|product| product.name().to_string())
                        .unwrap_or_default();

                    receipt.extend(summary.lines().iter().map(|charge| ReceiptLine {
                        name: name.clone(),
                        quantity,
                        charge: *charge,
                    }));
                }
                Err(error) => {
                    warn!(product = %number, quantity, %error, "order line refused");
                    writeln!(self.output, "{}\n", refusal_message(&error))?;
                }
            }
        }

        if !receipt.is_empty() {
            self.print_receipt(&receipt)?;
        }

        Ok(())
    }

    fn print_receipt(&mut self, receipt: &[ReceiptLine<'a>]) -> Result<(), MenuError> {
        let mut builder = Builder::default();
        let mut total: Money<'a, Currency> = Money::from_minor(0, self.store.currency());

        builder.push_record([
            "Product", "Amount", "Received", "Subtotal", "Saved", "Total",
        ]);

        for line in receipt {
            total = total.add(line.charge.total())?;

            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.charge
                    .bonus_quantity()
                    .unwrap_or(line.quantity)
                    .to_string(),
                format!("${}", plain_amount(&line.charge.subtotal())),
                saved_percent(&line.charge)?,
                format!("${}", plain_amount(&line.charge.total())),
            ]);
        }

        builder.push_record([
            "Order total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("${}", plain_amount(&total)),
        ]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..6), Alignment::right());

        writeln!(self.output, "{table}")?;

        Ok(())
    }
}

/// Resolve a 1-based product number and a positive amount entered by the customer.
fn parse_order_line(
    catalog: &[ProductKey],
    number: &str,
    amount: &str,
) -> Option<(ProductKey, i64)> {
    if !is_digits(number) || !is_digits(amount) {
        return None;
    }

    let index = number.parse::<usize>().ok()?.checked_sub(1)?;
    let quantity = amount.parse::<i64>().ok().filter(|quantity| *quantity > 0)?;
    let key = catalog.get(index)?;

    Some((*key, quantity))
}

/// Savings of a line as a percentage of its subtotal, e.g. `16.7%`.
fn saved_percent(charge: &Charge<'_>) -> Result<String, MoneyError> {
    let percent = (charge.savings_percent()? * Decimal::ONE_HUNDRED).round_dp(1);

    Ok(format!("{}%", percent.normalize()))
}

fn is_digits(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

fn refusal_message(error: &StoreError) -> String {
    match error {
        StoreError::OrderLine {
            source: ProductError::InsufficientStock { requested, .. },
            ..
        } => format!(
            "Error: The amount '{requested}' is more than the quantity available in the store."
        ),
        StoreError::OrderLine {
            source: ProductError::OrderLimitExceeded { maximum, .. },
            ..
        } => format!("Error: Only {maximum} allowed per order for this product."),
        StoreError::OrderLine {
            source: ProductError::Inactive(name),
            ..
        } => format!("Error: {name} is no longer available."),
        StoreError::ProductNotFound(_) => "Error adding product. Try again!".to_string(),
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, sync::Arc};

    use rusty_money::iso::USD;
    use storefront::{products::Product, promotions::Promotion};
    use testresult::TestResult;

    use super::*;

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    fn test_store() -> TestResult<Store<'static>> {
        let mut store = Store::new(USD);
        let mut macbook = Product::new("MacBook Air M2", usd(145_000), 100)?;
        let mut earbuds = Product::new("Bose QuietComfort Earbuds", usd(25_000), 500)?;

        macbook.set_promotion(Arc::new(Promotion::second_half_price("Second Half price!")));
        earbuds.set_promotion(Arc::new(Promotion::third_one_free("Third One Free!")));

        store.add_product(macbook)?;
        store.add_product(earbuds)?;
        store.add_product(Product::limited("Shipping", usd(1_000), 250, 1)?)?;

        Ok(store)
    }

    fn run_session(store: &mut Store<'static>, input: &str) -> TestResult<String> {
        let mut output = Vec::new();

        Menu::new(store, Cursor::new(input.as_bytes()), &mut output).run()?;

        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn quit_says_goodbye() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "4\n")?;

        assert!(output.contains("1. List all products in store"));
        assert!(output.ends_with("Thanks for shopping! Bye!\n"));

        Ok(())
    }

    #[test]
    fn end_of_input_quits() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "")?;

        assert!(output.ends_with("Thanks for shopping! Bye!\n"));

        Ok(())
    }

    #[test]
    fn invalid_choice_is_reported() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "abc\n7\n4\n")?;

        assert!(output.contains("Error with your choice 'abc'. Try again!"));
        assert!(output.contains("Error with your choice '7'. Try again!"));

        Ok(())
    }

    #[test]
    fn listing_numbers_active_products() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "1\n4\n")?;

        assert!(output.contains(
            "1. MacBook Air M2, Price: 1450, Quantity: 100, Promotion: Second Half price!"
        ));
        assert!(output.contains("3. Shipping, Price: 10, Quantity: Limited to 1 per order"));

        Ok(())
    }

    #[test]
    fn total_amount_sums_stock() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "2\n4\n")?;

        assert!(output.contains(" Total of 850 items in store"));

        Ok(())
    }

    #[test]
    fn ordering_prices_with_promotion() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "3\n1\n3\n\n\n4\n")?;

        assert!(output.contains("Product added to list."));
        assert!(output.contains("The total price of the order is $3625\n"));
        assert!(output.contains("Order total"));
        assert!(output.contains("16.7%"));
        assert_eq!(store.total_quantity(), 847);

        Ok(())
    }

    #[test]
    fn ordering_reports_bonus_items() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "3\n2\n6\n\n\n4\n")?;

        assert!(output.contains("The total price of the order is $1500 and total is 9"));

        Ok(())
    }

    #[test]
    fn ordering_rejects_bad_lines() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "3\nx\n1\n9\n1\n1\n0\n\n\n4\n")?;

        assert_eq!(output.matches("Error adding product. Try again!").count(), 3);
        assert_eq!(store.total_quantity(), 850);

        Ok(())
    }

    #[test]
    fn ordering_maps_stock_and_limit_refusals() -> TestResult {
        let mut store = test_store()?;
        let output = run_session(&mut store, "3\n1\n101\n3\n2\n\n\n4\n")?;

        assert!(output.contains(
            "Error: The amount '101' is more than the quantity available in the store."
        ));
        assert!(output.contains("Error: Only 1 allowed per order for this product."));
        assert!(!output.contains("Order total"));

        Ok(())
    }

    #[test]
    fn saved_percent_reports_promotion_savings() -> TestResult {
        let half = Charge::new(usd(435_000), usd(362_500));
        let none = Charge::full_price(usd(50_000));

        assert_eq!(saved_percent(&half)?, "16.7%");
        assert_eq!(saved_percent(&none)?, "0%");

        Ok(())
    }

    #[test]
    fn parse_order_line_validates_input() -> TestResult {
        let store = test_store()?;
        let catalog: Vec<ProductKey> = store.iter().map(|(key, _)| key).collect();
        let first = catalog.first().copied().ok_or("Expected a product")?;

        assert_eq!(parse_order_line(&catalog, "1", "2"), Some((first, 2)));
        assert_eq!(parse_order_line(&catalog, "0", "2"), None);
        assert_eq!(parse_order_line(&catalog, "4", "2"), None);
        assert_eq!(parse_order_line(&catalog, "1", "0"), None);
        assert_eq!(parse_order_line(&catalog, "1", "-2"), None);
        assert_eq!(parse_order_line(&catalog, "", "2"), None);

        Ok(())
    }
}
