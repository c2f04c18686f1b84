//! fxcalc
//!
//! Command-line calculator for money values and exchange rates.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ducat_core::prelude::*;
use ducat_shared::AppConfig;

/// fxcalc - exact money arithmetic and exchange-rate algebra
#[derive(Parser)]
#[command(name = "fxcalc")]
#[command(author = "Ducat Team")]
#[command(version)]
#[command(about = "Apply, invert and combine exchange rates", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a rate to a money value
    Exchange {
        /// Rate as "BASE/COUNTER RATE", e.g. "GBP/USD 1.5485"
        rate: String,

        /// Money as "CODE AMOUNT", e.g. "GBP 2.34"
        money: String,

        /// Rounding of the result, defaults to the configured policy
        #[arg(short, long)]
        rounding: Option<RoundingMode>,

        /// Use 64-bit minor units instead of arbitrary precision
        #[arg(short, long)]
        fixed: bool,
    },

    /// Swap the currencies of a rate
    Invert {
        /// Rate as "BASE/COUNTER RATE"
        rate: String,
    },

    /// Derive a rate through a shared currency
    Combine {
        /// First rate; its counter must appear in the second rate
        first: String,

        /// Second rate
        second: String,
    },

    /// Show registry details of a currency
    Currency {
        /// Three-letter currency code, or a two-letter country code with --country
        code: String,

        /// Treat the argument as a country code
        #[arg(short, long)]
        country: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxcalc=info,ducat_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let registry = CurrencyRegistry::with_extension(&config.registry.extension)
        .context("Invalid currency extension data")?
        .install()?;
    info!(
        currencies = registry.len(),
        scale = config.rates.scale,
        rounding = %config.rates.rounding,
        "Currency registry ready"
    );

    println!("{}", execute(cli.command, registry, &config.rates)?);
    Ok(())
}

/// Runs one command and renders its result.
fn execute(
    command: Commands,
    registry: &CurrencyRegistry,
    policy: &RatePolicy,
) -> anyhow::Result<String> {
    match command {
        Commands::Exchange {
            rate,
            money,
            rounding,
            fixed,
        } => {
            let rate = ExchangeRate::parse_with(&rate, registry)?;
            let mode = rounding.unwrap_or(policy.exchange_rounding);
            let result = if fixed {
                let value = Money::parse_with(&money, registry)?;
                rate.exchange_with(&value, mode)?.to_string()
            } else {
                let value = BigMoney::parse_with(&money, registry)?;
                rate.exchange_with(&value, mode)?.to_string()
            };
            Ok(result)
        }
        Commands::Invert { rate } => {
            let rate = ExchangeRate::parse_with(&rate, registry)?;
            Ok(rate.invert_with(policy)?.to_string())
        }
        Commands::Combine { first, second } => {
            let first = ExchangeRate::parse_with(&first, registry)?;
            let second = ExchangeRate::parse_with(&second, registry)?;
            Ok(first.combine_with(&second, policy)?.to_string())
        }
        Commands::Currency { code, country } => {
            let currency = if country {
                registry.for_country(&code)?
            } else {
                registry.lookup(&code)?
            };
            Ok(describe(registry, currency))
        }
    }
}

fn describe(registry: &CurrencyRegistry, currency: Currency) -> String {
    let places = if currency.is_pseudo_currency() {
        "none (pseudo-currency)".to_string()
    } else {
        currency.decimal_places().to_string()
    };
    let numeric = currency.numeric_3_code();
    let numeric = if numeric.is_empty() { "-" } else { numeric.as_str() };
    format!(
        "{}\n  numeric: {numeric}\n  decimal places: {places}\n  countries: {}",
        currency.code(),
        registry.countries_of(currency).join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("fxcalc").chain(args.iter().copied()))?;
        let registry = CurrencyRegistry::builtin()?;
        execute(cli.command, &registry, &RatePolicy::default())
    }

    #[test]
    fn test_exchange_command() {
        assert_eq!(run(&["exchange", "GBP/USD 1.5485", "GBP 2.34"]).unwrap(), "USD 3.62");
        assert_eq!(
            run(&["exchange", "GBP/USD 1.5485", "GBP 2.34", "--rounding", "floor"]).unwrap(),
            "USD 3.62"
        );
        assert_eq!(
            run(&["exchange", "GBP/USD 1.5485", "USD 3.62", "--fixed"]).unwrap(),
            "GBP 2.34"
        );
    }

    #[test]
    fn test_invert_and_combine_commands() {
        assert_eq!(run(&["invert", "GBP/USD 2"]).unwrap(), "USD/GBP 0.5");
        assert_eq!(
            run(&["combine", "EUR/USD 1.2", "USD/PLN 3.5"]).unwrap(),
            "EUR/PLN 4.2"
        );
        assert!(run(&["combine", "JPY/NOK 0.07", "USD/PLN 3.9"]).is_err());
    }

    #[test]
    fn test_currency_command() {
        let output = run(&["currency", "JPY"]).unwrap();
        assert!(output.starts_with("JPY\n  numeric: 392"));
        assert!(output.contains("decimal places: 0"));

        let output = run(&["currency", "--country", "CH"]).unwrap();
        assert!(output.starts_with("CHF"));

        let output = run(&["currency", "XAU"]).unwrap();
        assert!(output.contains("pseudo-currency"));
    }
}
