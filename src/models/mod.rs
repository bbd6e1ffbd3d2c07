mod trade;
mod user;
pub mod wire;

pub use trade::{is_supported_pair, Dashboard, PortfolioItem, Trade, TradeSide, TRADING_PAIRS};
pub use user::{Role, User};
pub use wire::{DataEnvelope, ErrorBody, MessageResponse, TokenResponse};
