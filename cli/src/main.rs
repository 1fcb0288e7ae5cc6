//! Predict CLI - off-chain previews for the BTC-backed prediction market
//!
//! Quotes AMM trades, borrowing power, and market outcomes from caller
//! supplied snapshots of on-chain state. Nothing here signs or submits a
//! transaction; the chain's own result always supersedes these numbers.

use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod amm;
mod borrow;
mod config;
mod directions;
mod market;
mod output;

use amm::{PoolArgs, SideArg};
use config::PreviewConfig;
use market_model::Direction;

#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Predict CLI - Preview trades, borrowing and market resolution", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/predict/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the effective config to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// AMM trade quotes
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Implied YES/NO probabilities of a pool
    Price {
        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Borrowing power and fees
    Borrow {
        #[command(subcommand)]
        command: BorrowCommands,
    },

    /// Market resolution
    Market {
        #[command(subcommand)]
        command: MarketCommands,
    },

    /// Compare an expected amount with the realized one
    Slippage {
        /// Amount quoted before the trade
        expected: String,

        /// Amount actually received
        actual: String,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Shares received for a collateral amount
    Buy {
        /// Side to buy
        #[arg(long, value_enum)]
        side: SideArg,

        /// Collateral to spend (token units)
        amount: String,

        #[command(flatten)]
        pool: PoolArgs,

        /// Fee in basis points (overrides config)
        #[arg(long)]
        fee_bps: Option<u64>,
    },

    /// Collateral received for selling shares
    Sell {
        /// Side to sell
        #[arg(long, value_enum)]
        side: SideArg,

        /// Shares to sell (token units)
        shares: String,

        #[command(flatten)]
        pool: PoolArgs,

        /// Fee in basis points (overrides config)
        #[arg(long)]
        fee_bps: Option<u64>,
    },

    /// Collateral needed to receive an exact number of shares
    Cost {
        /// Side to buy
        #[arg(long, value_enum)]
        side: SideArg,

        /// Shares wanted (token units)
        shares: String,

        #[command(flatten)]
        pool: PoolArgs,

        /// Fee in basis points (overrides config)
        #[arg(long)]
        fee_bps: Option<u64>,
    },
}

#[derive(Subcommand)]
enum BorrowCommands {
    /// Stablecoin a BTC deposit can back
    Amount {
        /// BTC collateral
        #[arg(long)]
        btc: Decimal,

        /// BTC price in USD
        #[arg(long)]
        price: Decimal,

        /// Collateralization ratio in percent
        #[arg(long, default_value = "150")]
        ratio: Decimal,
    },

    /// BTC price at which a trove becomes liquidatable
    Liquidation {
        /// Debt in USD
        #[arg(long)]
        borrow: Decimal,

        /// BTC collateral
        #[arg(long)]
        btc: Decimal,

        /// Minimum ratio in percent (overrides config)
        #[arg(long)]
        min_ratio: Option<Decimal>,
    },

    /// Issuance fee and liquidation deposit
    Fees {
        /// Debt in USD
        #[arg(long)]
        borrow: Decimal,

        /// Issuance fee in basis points (overrides config)
        #[arg(long)]
        fee_rate_bps: Option<u32>,
    },

    /// Full preview of a trove
    Position {
        /// BTC collateral
        #[arg(long)]
        btc: Decimal,

        /// Debt in USD
        #[arg(long, default_value = "0")]
        debt: Decimal,

        /// BTC price in USD
        #[arg(long)]
        price: Decimal,

        /// Target collateralization ratio in percent
        #[arg(long, default_value = "150")]
        ratio: Decimal,
    },
}

#[derive(Subcommand)]
enum MarketCommands {
    /// Compute a market's outcome from a reference price
    Resolve {
        /// Market address
        market: String,

        /// Reference BTC price in USD
        #[arg(long)]
        price: Decimal,

        /// Threshold price in USD
        #[arg(long)]
        threshold: Decimal,

        /// Expiration (unix seconds)
        #[arg(long)]
        expiration: i64,

        /// above or below (default: direction store, then "above")
        #[arg(long)]
        direction: Option<Direction>,

        /// Override the current time (unix seconds)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Whether a market has reached its expiration
    Status {
        /// Expiration (unix seconds)
        #[arg(long)]
        expiration: i64,

        /// Override the current time (unix seconds)
        #[arg(long)]
        now: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = PreviewConfig::load(cli.config.as_deref())?;

    // stdout carries only the report so --json stays parseable
    if cli.verbose {
        eprintln!("{} {}", "Fee (bps):".bright_cyan(), config.fee_bps);
        eprintln!("{} {}", "Borrowing fee (bps):".bright_cyan(), config.borrowing_fee_rate_bps);
        eprintln!("{} {}", "Minimum ratio (%):".bright_cyan(), config.min_collateral_ratio_pct);
        if let Some(store) = &config.direction_store {
            eprintln!("{} {}", "Direction store:".bright_cyan(), store.display());
        }
    }

    let json = cli.json;

    // Execute command
    match cli.command {
        Commands::Quote { command } => match command {
            QuoteCommands::Buy { side, amount, pool, fee_bps } => {
                amm::preview_buy(&config, side, &amount, &pool, fee_bps, json)?;
            }
            QuoteCommands::Sell { side, shares, pool, fee_bps } => {
                amm::preview_sell(&config, side, &shares, &pool, fee_bps, json)?;
            }
            QuoteCommands::Cost { side, shares, pool, fee_bps } => {
                amm::preview_cost(&config, side, &shares, &pool, fee_bps, json)?;
            }
        },
        Commands::Price { pool } => {
            amm::show_price(&pool, json)?;
        }
        Commands::Borrow { command } => match command {
            BorrowCommands::Amount { btc, price, ratio } => {
                borrow::preview_borrow_amount(btc, price, ratio, json)?;
            }
            BorrowCommands::Liquidation { borrow, btc, min_ratio } => {
                borrow::preview_liquidation_price(&config, borrow, btc, min_ratio, json)?;
            }
            BorrowCommands::Fees { borrow, fee_rate_bps } => {
                borrow::preview_fees(&config, borrow, fee_rate_bps, json)?;
            }
            BorrowCommands::Position { btc, debt, price, ratio } => {
                let position = borrow::parse_position(btc, debt, price, ratio)?;
                borrow::preview_position(&config, position, json)?;
            }
        },
        Commands::Market { command } => match command {
            MarketCommands::Resolve { market, price, threshold, expiration, direction, now } => {
                market::resolve_market(&config, market, price, threshold, expiration, direction, now, json)?;
            }
            MarketCommands::Status { expiration, now } => {
                market::show_status(expiration, now, json)?;
            }
        },
        Commands::Slippage { expected, actual } => {
            amm::show_slippage(&expected, &actual, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_buy() {
        let cli = Cli::try_parse_from([
            "predict", "quote", "buy", "--side", "yes", "100",
            "--reserve-yes", "1000", "--reserve-no", "1000",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote { command: QuoteCommands::Buy { side, amount, fee_bps, .. } } => {
                assert_eq!(side, SideArg::Yes);
                assert_eq!(amount, "100");
                assert_eq!(fee_bps, None);
            }
            _ => panic!("expected quote buy"),
        }
    }

    #[test]
    fn test_parse_direction() {
        let cli = Cli::try_parse_from([
            "predict", "market", "resolve", "0xabc", "--price", "70000",
            "--threshold", "70000", "--expiration", "0", "--direction", "below",
        ])
        .unwrap();
        match cli.command {
            Commands::Market { command: MarketCommands::Resolve { direction, .. } } => {
                assert_eq!(direction, Some(Direction::Below));
            }
            _ => panic!("expected market resolve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "predict", "price", "--reserve-yes", "1", "--reserve-no", "3",
            "--verbose", "--json", "--config", "/tmp/predict.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/predict.toml")));
        assert!(matches!(cli.command, Commands::Price { .. }));
    }
}
