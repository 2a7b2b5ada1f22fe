//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::config::Config;
use crate::importers::{Severity, ValidationReport};
use crate::portfolio::{AllocationSlice, PortfolioSummary, Position};
use crate::utils::{format_money, format_percent, format_quantity};

fn signed(text: String, value: Decimal) -> String {
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format a portfolio summary for JSON output
pub fn format_portfolio_json(summary: &PortfolioSummary, asset_type_filter: Option<&str>) -> String {
    #[derive(Serialize)]
    struct JsonPortfolio<'a> {
        positions: Vec<&'a Position>,
        total_portfolio_value: Decimal,
        total_capital_invested: Decimal,
        total_profit_loss: Decimal,
        profit_loss_percentage: Decimal,
        total_invested_with_fees: Decimal,
        total_returned: Decimal,
        by_asset_type: &'a [AllocationSlice],
        by_sector: &'a [AllocationSlice],
        skipped_trades: usize,
        out_of_range_trades: usize,
    }

    let positions = filter_positions(summary, asset_type_filter);

    let json = JsonPortfolio {
        positions,
        total_portfolio_value: summary.total_portfolio_value,
        total_capital_invested: summary.total_capital_invested,
        total_profit_loss: summary.total_profit_loss,
        profit_loss_percentage: summary.profit_loss_percentage,
        total_invested_with_fees: summary.total_invested_with_fees,
        total_returned: summary.total_returned,
        by_asset_type: &summary.by_asset_type,
        by_sector: &summary.by_sector,
        skipped_trades: summary.skipped_trades,
        out_of_range_trades: summary.out_of_range_trades,
    };

    serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Ranked positions, optionally restricted to one asset type (case-insensitive)
pub fn filter_positions<'a>(
    summary: &'a PortfolioSummary,
    asset_type_filter: Option<&str>,
) -> Vec<&'a Position> {
    summary
        .ranked()
        .into_iter()
        .filter(|p| match asset_type_filter {
            Some(filter) => p
                .asset
                .asset_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(filter)),
            None => true,
        })
        .collect()
}

/// Format a portfolio summary for terminal table output
pub fn format_portfolio_table(
    summary: &PortfolioSummary,
    asset_type_filter: Option<&str>,
    config: &Config,
) -> String {
    let mut output = String::new();
    let symbol = config.currency_symbol.as_str();
    let places = config.decimal_places;

    if let Some(filter) = asset_type_filter {
        output.push_str(&format!("\n{} Portfolio - {} only\n\n", "📊".cyan().bold(), filter));
    } else {
        output.push_str(&format!("\n{} Complete Portfolio\n\n", "📊".cyan().bold()));
    }

    #[derive(Tabled)]
    struct PositionRow {
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Type")]
        asset_type: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Avg Price")]
        avg_price: String,
        #[tabled(rename = "Invested")]
        invested: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "P&L")]
        pl: String,
        #[tabled(rename = "Return %")]
        return_pct: String,
        #[tabled(rename = "Alloc %")]
        allocation: String,
    }

    let rows: Vec<PositionRow> = filter_positions(summary, asset_type_filter)
        .into_iter()
        .map(|p| PositionRow {
            ticker: p.asset.ticker.clone(),
            asset_type: p.asset.asset_type.clone().unwrap_or_else(|| "-".to_string()),
            quantity: format_quantity(p.quantity),
            avg_price: format_money(p.avg_buy_price, places, symbol),
            invested: format_money(p.total_invested, places, symbol),
            price: format_money(p.asset.current_price, places, symbol),
            value: format_money(p.current_value, places, symbol),
            pl: signed(format_money(p.unrealized_pnl, places, symbol), p.unrealized_pnl),
            return_pct: signed(format_percent(p.unrealized_pnl_pct, places), p.unrealized_pnl_pct),
            allocation: format_percent(p.allocation, places),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align all columns except Ticker (0) and Type (1)
    table.modify(Columns::new(2..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{} Summary", "━".repeat(80).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total Value:".bold(),
        format_money(summary.total_portfolio_value, places, symbol)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Capital Invested:".bold(),
        format_money(summary.total_capital_invested, places, symbol)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total P&L:".bold(),
        signed(format_money(summary.total_profit_loss, places, symbol), summary.total_profit_loss)
    ));
    output.push_str(&format!(
        "\n{:<20} {}\n",
        "Total Return:".bold(),
        signed(
            format_percent(summary.profit_loss_percentage, places),
            summary.profit_loss_percentage
        )
    ));

    if summary.skipped_trades > 0 {
        output.push_str(&format!(
            "{} {} trade(s) reference unknown assets and were ignored\n",
            "⚠".yellow().bold(),
            summary.skipped_trades
        ));
    }
    if summary.out_of_range_trades > 0 {
        output.push_str(&format!(
            "{} {} trade(s) have amounts out of range and were ignored\n",
            "⚠".yellow().bold(),
            summary.out_of_range_trades
        ));
    }

    output
}

/// Format an allocation breakdown for terminal table output
pub fn format_allocation_table(title: &str, slices: &[AllocationSlice], config: &Config) -> String {
    #[derive(Tabled)]
    struct SliceRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Share")]
        share: String,
    }

    let rows: Vec<SliceRow> = slices
        .iter()
        .map(|s| SliceRow {
            name: s.name.clone(),
            value: format_money(s.value, config.decimal_places, &config.currency_symbol),
            share: format_percent(s.percentage, config.decimal_places),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    format!("\n{} Allocation by {}\n\n{}\n", "📊".cyan().bold(), title, table)
}

pub fn format_allocation_json(slices: &[AllocationSlice]) -> String {
    serde_json::to_string_pretty(slices)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format validation issues, one line per issue, followed by counts
pub fn format_validation_report(report: &ValidationReport) -> String {
    if report.is_clean() {
        return format!("{} Ledger looks consistent\n", "✓".green().bold());
    }

    let mut output = String::new();
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => issue.severity.as_str().red().bold(),
            Severity::Warning => issue.severity.as_str().yellow().bold(),
            Severity::Info => issue.severity.as_str().blue().bold(),
        };
        let record = issue
            .record_id
            .as_deref()
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();
        output.push_str(&format!(
            "{}{} {}: {}",
            label, record, issue.field, issue.reason
        ));
        if !issue.value.is_empty() {
            output.push_str(&format!(" (value: {})", issue.value));
        }
        output.push('\n');
    }

    let counts: Vec<String> = report
        .severity_counts()
        .iter()
        .rev()
        .map(|(severity, n)| format!("{} {}", n, severity.as_str().to_lowercase()))
        .collect();
    output.push_str(&format!("\n{}\n", counts.join(", ")));
    output
}

pub fn format_validation_json(report: &ValidationReport) -> String {
    #[derive(Serialize)]
    struct JsonIssue<'a> {
        severity: &'static str,
        record_id: Option<&'a str>,
        field: &'a str,
        value: &'a str,
        reason: &'a str,
    }

    let issues: Vec<JsonIssue> = report
        .issues
        .iter()
        .map(|i| JsonIssue {
            severity: i.severity.as_str(),
            record_id: i.record_id.as_deref(),
            field: &i.field,
            value: &i.value,
            reason: &i.reason,
        })
        .collect();

    serde_json::to_string_pretty(&issues)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format empty portfolio message
pub fn format_empty_portfolio() -> String {
    format!(
        "{} No positions found\nAdd BUY trades to the ledger, or check that their asset ids exist in the catalog.\n",
        "ℹ".blue().bold()
    )
}
