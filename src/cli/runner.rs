use anyhow::Result;
use std::process::ExitCode;
use tracing::info;

use super::formatters;
use super::{AllocationGrouping, Cli, Commands, LedgerArgs, PortfolioCommands};
use crate::config::Config;
use crate::importers::{load_assets, load_trades, validate_ledger};
use crate::models::{Asset, Trade};
use crate::portfolio::{aggregate_with, LedgerOrder, PortfolioSummary};

/// Execute a parsed command line, writing results to stdout
pub fn run(cli: &Cli, config: &Config) -> Result<ExitCode> {
    match &cli.command {
        Commands::Portfolio { action } => match action {
            PortfolioCommands::Show { ledger, asset_type } => {
                let summary = summarize(ledger, config)?;
                if cli.json {
                    println!(
                        "{}",
                        formatters::format_portfolio_json(&summary, asset_type.as_deref())
                    );
                } else if summary.is_empty() {
                    print!("{}", formatters::format_empty_portfolio());
                } else {
                    print!(
                        "{}",
                        formatters::format_portfolio_table(&summary, asset_type.as_deref(), config)
                    );
                }
                Ok(ExitCode::SUCCESS)
            }
            PortfolioCommands::Allocation { ledger, by } => {
                let summary = summarize(ledger, config)?;
                let (title, slices) = match by {
                    AllocationGrouping::Type => ("asset type", &summary.by_asset_type),
                    AllocationGrouping::Sector => ("sector", &summary.by_sector),
                };
                if cli.json {
                    println!("{}", formatters::format_allocation_json(slices));
                } else if slices.is_empty() {
                    print!("{}", formatters::format_empty_portfolio());
                } else {
                    print!("{}", formatters::format_allocation_table(title, slices, config));
                }
                Ok(ExitCode::SUCCESS)
            }
        },

        Commands::Validate { ledger } => {
            let (assets, trades) = load_ledger(ledger)?;
            let arranged = ledger_order(ledger, config).arrange(&trades);
            let report = validate_ledger(&assets, &arranged);

            if cli.json {
                println!("{}", formatters::format_validation_json(&report));
            } else {
                print!("{}", formatters::format_validation_report(&report));
            }

            if report.has_errors() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn ledger_order(ledger: &LedgerArgs, config: &Config) -> LedgerOrder {
    if ledger.chronological {
        LedgerOrder::Chronological
    } else {
        config.ledger_order
    }
}

fn load_ledger(ledger: &LedgerArgs) -> Result<(Vec<Asset>, Vec<Trade>)> {
    let assets = load_assets(&ledger.assets)?;
    let trades = load_trades(&ledger.trades)?;
    info!("Loaded {} assets and {} trades", assets.len(), trades.len());
    Ok((assets, trades))
}

fn summarize(ledger: &LedgerArgs, config: &Config) -> Result<PortfolioSummary> {
    let (assets, trades) = load_ledger(ledger)?;
    Ok(aggregate_with(&assets, &trades, ledger_order(ledger, config)))
}
