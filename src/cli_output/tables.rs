//! Plain-text tables for portfolio holdings and trades.

use rust_decimal::Decimal;

use crate::models::{PortfolioItem, Trade};

/// Render rows under a header, each column padded to its widest cell.
fn render(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}

fn money(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}

/// Like [`money`], but `n/a` for a total that overflowed.
fn money_or_na(value: Option<Decimal>) -> String {
    value.map(money).unwrap_or_else(|| "n/a".to_string())
}

/// Portfolio holdings with their total value.
pub fn format_portfolio(items: &[PortfolioItem]) -> String {
    if items.is_empty() {
        return "No holdings yet.".to_string();
    }

    let rows = items
        .iter()
        .map(|item| {
            vec![
                item.symbol.clone(),
                item.quantity.normalize().to_string(),
                money(item.value),
            ]
        })
        .collect();
    let total = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.value));

    format!(
        "{}\n\nTotal value: {}",
        render(&["ASSET", "QUANTITY", "VALUE"], rows),
        money_or_na(total)
    )
}

/// Trade history. The ledger view adds the owning user's id.
pub fn format_trades(trades: &[Trade], with_user: bool) -> String {
    if trades.is_empty() {
        return "No trades recorded.".to_string();
    }

    let mut headers = vec!["DATE", "PAIR", "SIDE", "PRICE", "QUANTITY", "TOTAL"];
    if with_user {
        headers.insert(0, "USER");
    }

    let rows = trades
        .iter()
        .map(|trade| {
            let mut row = vec![
                trade.executed_at.format("%Y-%m-%d %H:%M").to_string(),
                trade.symbol.clone(),
                trade.side.to_string(),
                money(trade.price),
                trade.quantity.normalize().to_string(),
                money_or_na(trade.total()),
            ];
            if with_user {
                row.insert(0, trade.user_id.to_string());
            }
            row
        })
        .collect();

    render(&headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSide;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn trade() -> Trade {
        Trade {
            id: 1,
            user_id: 9,
            symbol: "BTC/USD".to_string(),
            side: TradeSide::Buy,
            price: Decimal::from_str("42000.50").unwrap(),
            quantity: Decimal::from_str("0.50").unwrap(),
            executed_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_portfolio(&[]), "No holdings yet.");
        assert_eq!(format_trades(&[], false), "No trades recorded.");
    }

    #[test]
    fn test_portfolio_total() {
        let items = vec![
            PortfolioItem {
                symbol: "BTC/USD".to_string(),
                quantity: Decimal::from_str("0.5").unwrap(),
                value: Decimal::from_str("21000.25").unwrap(),
            },
            PortfolioItem {
                symbol: "ETH/USD".to_string(),
                quantity: Decimal::from_str("2").unwrap(),
                value: Decimal::from_str("5000").unwrap(),
            },
        ];

        let table = format_portfolio(&items);
        assert!(table.starts_with("ASSET"));
        assert!(table.contains("ETH/USD"));
        assert!(table.ends_with("Total value: $26000.25"));
    }

    #[test]
    fn test_trade_rows() {
        let table = format_trades(&[trade()], false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2024-03-01 14:30  BTC/USD  BUY"));
        assert!(lines[2].ends_with("$21000.25"));
    }

    #[test]
    fn test_overflowing_totals_shown_as_na() {
        let mut huge = trade();
        huge.price = Decimal::from_str("100000000000000000000").unwrap();
        huge.quantity = Decimal::from_str("100000000000000000000").unwrap();
        let table = format_trades(&[huge], false);
        assert!(table.lines().nth(2).unwrap().ends_with("n/a"));

        let items: Vec<PortfolioItem> = ["BTC/USD", "ETH/USD"]
            .iter()
            .map(|symbol| PortfolioItem {
                symbol: symbol.to_string(),
                quantity: Decimal::ONE,
                value: Decimal::MAX,
            })
            .collect();
        assert!(format_portfolio(&items).ends_with("Total value: n/a"));
    }

    #[test]
    fn test_ledger_includes_user() {
        let table = format_trades(&[trade()], true);
        assert!(table.starts_with("USER"));
        assert!(table.lines().nth(2).unwrap().starts_with('9'));
    }
}
