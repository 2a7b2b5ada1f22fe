use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Personal investment portfolio tracker")]
#[command(
    long_about = "Derive current holdings, average cost, unrealized P&L and allocation from an asset catalog and a BUY/SELL trade ledger (JSON or CSV)."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a config file (defaults to <config dir>/folio/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Asset catalog and trade ledger locations
#[derive(clap::Args, Debug, Clone)]
pub struct LedgerArgs {
    /// Asset catalog file (.json or .csv)
    #[arg(long)]
    pub assets: PathBuf,

    /// Trade ledger file (.json or .csv)
    #[arg(long)]
    pub trades: PathBuf,

    /// Sort trades by date before folding (overrides the configured ledger order)
    #[arg(long)]
    pub chronological: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Portfolio positions and allocation
    Portfolio {
        #[command(subcommand)]
        action: PortfolioCommands,
    },

    /// Check the asset catalog and trade ledger for data problems
    Validate {
        #[command(flatten)]
        ledger: LedgerArgs,
    },
}

#[derive(Subcommand)]
pub enum PortfolioCommands {
    /// Show open positions and portfolio totals
    Show {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Only list positions of this asset type (totals stay portfolio-wide)
        #[arg(long = "type")]
        asset_type: Option<String>,
    },

    /// Show allocation by asset type or sector
    Allocation {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Grouping to display
        #[arg(long, value_enum, default_value_t = AllocationGrouping::Type)]
        by: AllocationGrouping,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllocationGrouping {
    Type,
    Sector,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_portfolio_show() {
        let cli = Cli::try_parse_from([
            "folio", "--json", "portfolio", "show", "--assets", "a.json", "--trades", "t.csv",
            "--type", "Stock",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Portfolio {
                action: PortfolioCommands::Show { ledger, asset_type },
            } => {
                assert_eq!(ledger.trades, PathBuf::from("t.csv"));
                assert!(!ledger.chronological);
                assert_eq!(asset_type.as_deref(), Some("Stock"));
            }
            _ => panic!("expected portfolio show"),
        }
    }

    #[test]
    fn test_parse_allocation_by_sector() {
        let cli = Cli::try_parse_from([
            "folio", "portfolio", "allocation", "--assets", "a.json", "--trades", "t.json",
            "--by", "sector", "--chronological",
        ])
        .unwrap();
        match cli.command {
            Commands::Portfolio {
                action: PortfolioCommands::Allocation { ledger, by },
            } => {
                assert_eq!(by, AllocationGrouping::Sector);
                assert!(ledger.chronological);
            }
            _ => panic!("expected portfolio allocation"),
        }
    }
}
