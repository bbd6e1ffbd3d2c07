//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::models::TradeSide;

/// Terminal client for the TradeLog trading journal.
#[derive(Parser, Debug)]
#[command(name = "tradelog", author, version, about, long_about = None)]
pub struct Args {
    /// Base endpoint of the TradeLog API (overrides TRADELOG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in to your account.
    Login {
        #[arg(long, short)]
        email: String,
        /// Prompted for when omitted.
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Create an account.
    Register {
        #[arg(long, short)]
        email: String,
        /// Prompted for when omitted.
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Show portfolio holdings and trade history.
    Dashboard,
    /// Record a trade, e.g. `tradelog trade BTC/USD buy 42000 0.5`.
    #[command(allow_negative_numbers = true)]
    Trade {
        /// Trading pair (BTC/USD, ETH/USD, SOL/USD, DOGE/USD, AAPL/USD)
        symbol: String,
        /// BUY or SELL
        side: TradeSide,
        /// Price per unit
        price: Decimal,
        /// Amount traded
        quantity: Decimal,
    },
    /// Become an administrator using the admin secret.
    Promote {
        /// Prompted for when omitted.
        #[arg(long, short)]
        secret: Option<String>,
    },
    /// Show the global trade ledger (administrators only).
    Admin,
}
