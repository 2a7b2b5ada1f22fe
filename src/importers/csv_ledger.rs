use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::FolioError;
use crate::models::{normalize_ticker, parse_date, parse_decimal, Asset, Trade, TradeType};

#[derive(Debug)]
struct AssetColumns {
    id: usize,
    ticker: usize,
    current_price: usize,
    asset_type: Option<usize>,
    sector: Option<usize>,
    name: Option<usize>,
}

#[derive(Debug)]
struct TradeColumns {
    id: usize,
    asset_id: usize,
    trade_type: usize,
    quantity: usize,
    price: usize,
    date: usize,
    fee: Option<usize>,
    notes: Option<usize>,
}

/// Parse an asset catalog CSV (header row, comma-delimited)
pub fn parse_assets_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Asset>> {
    let path = path.as_ref();
    info!("Parsing assets CSV: {:?}", path);

    let (headers, records) = read_csv(path)?;
    let columns = AssetColumns {
        id: require(&headers, &["id", "asset_id"])?,
        ticker: require(&headers, &["ticker", "symbol"])?,
        current_price: require(&headers, &["current_price", "price"])?,
        asset_type: find(&headers, &["asset_type", "type"]),
        sector: find(&headers, &["sector"]),
        name: find(&headers, &["name"]),
    };
    debug!("Asset column mapping: {:?}", columns);

    let assets = collect_rows(records, |record| parse_asset_row(record, &columns));
    info!("Successfully parsed {} assets from CSV", assets.len());
    Ok(assets)
}

/// Parse a trade ledger CSV, preserving row order
pub fn parse_trades_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Trade>> {
    let path = path.as_ref();
    info!("Parsing trades CSV: {:?}", path);

    let (headers, records) = read_csv(path)?;
    let columns = TradeColumns {
        id: require(&headers, &["id", "trade_id"])?,
        asset_id: require(&headers, &["asset_id", "asset"])?,
        trade_type: require(&headers, &["type", "trade_type", "side"])?,
        quantity: require(&headers, &["quantity", "qty"])?,
        price: require(&headers, &["price"])?,
        date: require(&headers, &["date", "trade_date"])?,
        fee: find(&headers, &["fee", "fees"]),
        notes: find(&headers, &["notes"]),
    };
    debug!("Trade column mapping: {:?}", columns);

    let trades = collect_rows(records, |record| parse_trade_row(record, &columns));
    info!("Successfully parsed {} trades from CSV", trades.len());
    Ok(trades)
}

fn read_csv(path: &Path) -> Result<(StringRecord, Vec<csv::Result<StringRecord>>)> {
    let file = File::open(path)
        .map_err(FolioError::Io)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    debug!("CSV headers: {:?}", headers);

    Ok((headers, reader.records().collect()))
}

/// Rows that fail to parse are skipped with a warning; line numbers count the header as line 1.
fn collect_rows<T, F>(records: Vec<csv::Result<StringRecord>>, parse: F) -> Vec<T>
where
    F: Fn(&StringRecord) -> Result<T>,
{
    let mut parsed = Vec::new();
    for (idx, result) in records.into_iter().enumerate() {
        let line = idx + 2;
        let outcome = result
            .map_err(|e| anyhow!("Failed to read CSV record: {}", e))
            .and_then(|record| parse(&record));
        match outcome {
            Ok(item) => parsed.push(item),
            Err(e) => warn!("Skipping line {}: {}", line, e),
        }
    }
    parsed
}

fn find(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_lowercase().replace([' ', '-'], "_");
        names.contains(&normalized.as_str())
    })
}

fn require(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    find(headers, names).ok_or_else(|| FolioError::MissingColumn(names[0].to_string()).into())
}

fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn required_cell<'r>(record: &'r StringRecord, idx: usize, field: &str) -> Result<&'r str> {
    cell(record, idx).ok_or_else(|| anyhow!("Missing value for '{}'", field))
}

fn optional_cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| cell(record, i)).map(str::to_string)
}

fn parse_asset_row(record: &StringRecord, columns: &AssetColumns) -> Result<Asset> {
    Ok(Asset {
        id: required_cell(record, columns.id, "id")?.to_string(),
        ticker: normalize_ticker(required_cell(record, columns.ticker, "ticker")?),
        asset_type: optional_cell(record, columns.asset_type),
        sector: optional_cell(record, columns.sector),
        current_price: parse_decimal(required_cell(record, columns.current_price, "current_price")?)?,
        name: optional_cell(record, columns.name),
    })
}

fn parse_trade_row(record: &StringRecord, columns: &TradeColumns) -> Result<Trade> {
    let raw_type = required_cell(record, columns.trade_type, "type")?;
    let trade_type = TradeType::from_str(raw_type)
        .map_err(|_| FolioError::Parse(format!("Unknown trade type '{}'", raw_type)))?;

    let fee = match columns.fee.and_then(|i| cell(record, i)) {
        Some(raw) => parse_decimal(raw)?,
        None => Decimal::ZERO,
    };

    Ok(Trade {
        id: required_cell(record, columns.id, "id")?.to_string(),
        asset_id: required_cell(record, columns.asset_id, "asset_id")?.to_string(),
        trade_type,
        quantity: parse_decimal(required_cell(record, columns.quantity, "quantity")?)?,
        price: parse_decimal(required_cell(record, columns.price, "price")?)?,
        fee,
        date: parse_date(required_cell(record, columns.date, "date")?)?,
        notes: optional_cell(record, columns.notes),
    })
}
