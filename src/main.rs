use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use tradelog::adapters::WatchNavigator;
use tradelog::cli::{run_command, Args};
use tradelog::cli_output::print_error_toast;
use tradelog::config::ClientConfig;
use tradelog::error::{ApiError, ErrorCategory};
use tradelog::view::View;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_url {
        config = config.with_api_url(url);
    }
    tracing::debug!(api_url = %config.api_url, "Using backend");

    let navigator = Arc::new(WatchNavigator::new(View::Dashboard));
    let client = config.build_client(navigator.clone())?;

    let result = run_command(&client, args.command).await;
    tracing::debug!(view = %navigator.current(), "Command finished");
    result
}

/// Print a failed command the way the client surfaces errors: a toast with a
/// title and a description.
fn report(err: &color_eyre::Report) {
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => {
            tracing::debug!(code = api_err.error_code(), "{}", api_err);
            print_error_toast(api_err.title(), &api_err.user_message());
            if api_err.category() == ErrorCategory::Auth {
                eprintln!("  {}", api_err.category().recovery_hint());
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.verbose);

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(err) = runtime.block_on(run(args)) {
        report(&err);
        std::process::exit(1);
    }

    Ok(())
}
