// Import module - asset catalog and trade ledger loaders (JSON / CSV)

pub mod csv_ledger;
pub mod json_ledger;
pub mod validation;
mod file_detector;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::{Asset, Trade};

pub use file_detector::{detect_file_type, FileType};
pub use validation::{validate_ledger, Severity, ValidationIssue, ValidationReport};

/// Load an asset catalog, detecting JSON vs CSV from the file extension
pub fn load_assets<P: AsRef<Path>>(path: P) -> Result<Vec<Asset>> {
    let path = path.as_ref();
    info!("Loading assets from: {:?}", path);

    let assets = match detect_file_type(path)? {
        FileType::Json => json_ledger::parse_assets_json(path),
        FileType::Csv => csv_ledger::parse_assets_csv(path),
    }
    .with_context(|| format!("Failed to load assets from {}", path.display()))?;

    Ok(assets)
}

/// Load a trade ledger in file order, detecting JSON vs CSV from the file extension
pub fn load_trades<P: AsRef<Path>>(path: P) -> Result<Vec<Trade>> {
    let path = path.as_ref();
    info!("Loading trades from: {:?}", path);

    let trades = match detect_file_type(path)? {
        FileType::Json => json_ledger::parse_trades_json(path),
        FileType::Csv => csv_ledger::parse_trades_csv(path),
    }
    .with_context(|| format!("Failed to load trades from {}", path.display()))?;

    Ok(trades)
}
