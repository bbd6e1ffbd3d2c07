//! Line-based terminal output: headers, toasts and tables.

mod boxes;
mod tables;

pub use boxes::*;
pub use tables::{format_portfolio, format_trades};
