use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::error::FolioError;
use crate::models::{Asset, Trade};

/// Parse a JSON array of assets
pub fn parse_assets_json<P: AsRef<Path>>(path: P) -> Result<Vec<Asset>> {
    let assets: Vec<Asset> = read_json_array(path.as_ref())?;
    info!("Parsed {} assets from JSON", assets.len());
    Ok(assets)
}

/// Parse a JSON array of trades, preserving file order
pub fn parse_trades_json<P: AsRef<Path>>(path: P) -> Result<Vec<Trade>> {
    let trades: Vec<Trade> = read_json_array(path.as_ref())?;
    info!("Parsed {} trades from JSON", trades.len());
    Ok(trades)
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)
        .map_err(FolioError::Io)
        .with_context(|| format!("Failed to open {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON in {:?}", path))
}
