//! Execution of parsed commands against an [`ApiClient`].

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use super::args::Command;
use crate::api::ApiClient;
use crate::cli_output::{
    format_portfolio, format_trades, print_fields, print_header, print_toast, ToastKind,
};
use crate::forms::{LoginForm, PromoteForm, RegisterForm, TradeForm};

fn password_or_prompt(password: Option<String>, prompt: &str) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password(prompt).wrap_err("Failed to read from terminal"),
    }
}

/// Run one command to completion.
pub async fn run_command(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let state = client.login(&LoginForm { email, password }).await?;
            let detail = state
                .user
                .map(|user| format!("Signed in as {} ({})", user.email, user.role))
                .unwrap_or_default();
            print_toast(ToastKind::Success, "Welcome back", &detail);
        }
        Command::Register { email, password } => {
            let password = password_or_prompt(password, "Choose a password: ")?;
            let message = client.register(&RegisterForm { email, password }).await?;
            let detail = if message.is_empty() {
                "Sign in with `tradelog login`".to_string()
            } else {
                message
            };
            print_toast(ToastKind::Success, "Account created", &detail);
        }
        Command::Logout => {
            client.logout().await?;
            print_toast(ToastKind::Success, "Signed out", "");
        }
        Command::Whoami => {
            let state = client.auth_state().await?;
            match state.user.filter(|_| state.is_authenticated) {
                Some(user) => print_fields(&[
                    ("Email", user.email),
                    ("Role", user.role.to_string()),
                    ("User ID", user.id.to_string()),
                ]),
                None => print_toast(
                    ToastKind::Warning,
                    "Not signed in",
                    "Sign in with `tradelog login`",
                ),
            }
        }
        Command::Dashboard => {
            let dashboard = client.dashboard().await?;
            print_header("PORTFOLIO");
            println!("{}", format_portfolio(&dashboard.portfolio));
            print_header("TRADE HISTORY");
            println!("{}", format_trades(&dashboard.trades, false));
        }
        Command::Trade {
            symbol,
            side,
            price,
            quantity,
        } => {
            let form = TradeForm {
                symbol,
                side,
                price,
                quantity,
            };
            let summary = format!(
                "{} {} {} @ {} (total {})",
                form.side,
                form.quantity,
                form.symbol,
                form.price,
                form
                    .estimated_total()
                    .map(|total| total.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            );
            let message = client.submit_trade(&form).await?;
            let title = if message.is_empty() {
                "Trade recorded".to_string()
            } else {
                message
            };
            print_toast(ToastKind::Success, &title, &summary);
        }
        Command::Promote { secret } => {
            let secret = password_or_prompt(secret, "Admin secret: ")?;
            let message = client.promote(&PromoteForm { secret }).await?;
            let title = if message.is_empty() {
                "Promoted to admin".to_string()
            } else {
                message
            };
            print_toast(
                ToastKind::Success,
                &title,
                "Signed out. Sign in again to use admin access.",
            );
        }
        Command::Admin => {
            let trades = client.admin_ledger().await?;
            print_header("ADMIN LEDGER");
            println!("{}", format_trades(&trades, true));
        }
    }

    Ok(())
}
