//! Storefront CLI
//!
//! Stocks a store from a fixture set and runs the ordering menu on the terminal.

use std::{io, process::ExitCode};

use clap::Parser;
use storefront::prelude::{Fixture, FixtureError};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::util::TryInitError;

use crate::{
    config::Config,
    menu::{Menu, MenuError},
};

mod config;
mod logging;
mod menu;

/// Errors that stop the CLI.
#[derive(Debug, Error)]
enum CliError {
    /// Logging could not be installed
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),

    /// The fixture set could not be loaded
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The menu loop failed
    #[error(transparent)]
    Menu(#[from] MenuError),
}

fn main() -> ExitCode {
    let config = Config::parse();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "storefront stopped");
            report(&err);

            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "Fatal errors are shown on the terminal")]
fn report(err: &CliError) {
    eprintln!("Error: {err}");
}

fn run(config: &Config) -> Result<(), CliError> {
    logging::init(&config.logging)?;

    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture
        .load_promotions(&config.catalog)?
        .load_products(&config.catalog)?;

    let mut store = fixture.into_store()?;

    info!(
        catalog = %config.catalog,
        products = store.len(),
        items = store.total_quantity(),
        "store stocked"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();

    Menu::new(&mut store, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
