use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset pairs the trade dialog offers.
pub const TRADING_PAIRS: [(&str, &str); 5] = [
    ("BTC/USD", "Bitcoin (BTC/USD)"),
    ("ETH/USD", "Ethereum (ETH/USD)"),
    ("SOL/USD", "Solana (SOL/USD)"),
    ("DOGE/USD", "Dogecoin (DOGE/USD)"),
    ("AAPL/USD", "Apple (AAPL/USD)"),
];

/// Returns true if `symbol` is one of [`TRADING_PAIRS`].
pub fn is_supported_pair(symbol: &str) -> bool {
    TRADING_PAIRS.iter().any(|(value, _)| *value == symbol)
}

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    #[default]
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(format!("invalid trade side '{}': expected BUY or SELL", other)),
        }
    }
}

/// A recorded trade, as returned by the history and ledger endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub user_id: u64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub price: Decimal,
    pub quantity: Decimal,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Notional value of the trade, or `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// Current holding of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub symbol: String,
    pub quantity: Decimal,
    pub value: Decimal,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub portfolio: Vec<PortfolioItem>,
    pub trades: Vec<Trade>,
}
