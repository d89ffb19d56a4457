//! Storefront cart replay tool

use std::{
    fs::File,
    io::{self, Write},
    process::ExitCode,
};

use rusty_money::{Money, iso::GBP};
use storefront_cart::{
    cart::Cart,
    checkout::CheckoutError,
    cli::{CliArgs, init_logging},
    config::{CartConfig, ConfigError},
    persistence::{CartSnapshot, PersistenceError},
    receipt::{Receipt, ReceiptError},
    replay::{ActionLog, ReplayError},
    store::CartStore,
};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = match CliArgs::load() {
        Ok(args) => args,
        Err(err) => err.exit(),
    };

    if let Err(err) = init_logging(&args.log_level, args.log_format) {
        return report(&AppError::from(err));
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

#[expect(clippy::print_stderr, reason = "Command line error reporting")]
fn report(err: &AppError) -> ExitCode {
    error!(error = %err, "storefront-cart failed");
    eprintln!("error: {err}");

    ExitCode::FAILURE
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => CartConfig::from_file(path)?,
        None => CartConfig::new(Money::from_minor(0, GBP)),
    };

    let mut store = CartStore::new(Cart::from_config(&config));

    if let Some(path) = &args.restore {
        store.restore(CartSnapshot::read_from(File::open(path)?)?)?;
    }

    let applied = ActionLog::from_file(&args.actions)?.replay(&mut store)?;

    info!(applied, lines = store.state().len(), "action log replayed");

    if let Some(path) = &args.snapshot {
        store.snapshot().write_to(File::create(path)?)?;

        info!(path = %path.display(), "cart snapshot written");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let summary = match store.checkout() {
        Ok(summary) => summary,
        Err(CheckoutError::EmptyCart) => {
            writeln!(handle, "Cart is empty")?;

            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut handle, &summary).map_err(io::Error::from)?;
        writeln!(handle)?;
    } else {
        Receipt::new(&summary)?.write_to(&mut handle)?;
    }

    Ok(())
}
