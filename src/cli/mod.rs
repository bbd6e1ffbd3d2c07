//! Command-line interface for TradeLog.
//!
//! ```ignore
//! use clap::Parser;
//! use tradelog::cli::{run_command, Args};
//!
//! let args = Args::parse();
//! run_command(&client, args.command).await?;
//! ```

pub mod args;
pub mod commands;

pub use args::{Args, Command};
pub use commands::run_command;
