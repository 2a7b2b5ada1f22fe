use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Tradable instrument (stock, ETF, fund, crypto...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: String,
    #[serde(deserialize_with = "deserialize_ticker")]
    pub ticker: String,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    pub current_price: Decimal,
    #[serde(default)]
    pub name: Option<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>, ticker: &str, current_price: Decimal) -> Self {
        Self {
            id: id.into(),
            ticker: normalize_ticker(ticker),
            asset_type: None,
            sector: None,
            current_price,
            name: None,
        }
    }

    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// Tickers are unique per owner and always stored upper-case.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

fn deserialize_ticker<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_ticker(&raw))
}

/// Trade type (buy or sell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
        }
    }
}

impl FromStr for TradeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "B" => Ok(TradeType::Buy),
            "SELL" | "S" => Ok(TradeType::Sell),
            _ => Err(()),
        }
    }
}

/// Immutable ledger event against one asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: String,
    pub asset_id: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_fee")]
    pub fee: Decimal,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Trade {
    pub fn new(
        id: impl Into<String>,
        asset_id: impl Into<String>,
        trade_type: TradeType,
        quantity: Decimal,
        price: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            asset_id: asset_id.into(),
            trade_type,
            quantity,
            price,
            fee: Decimal::ZERO,
            date,
            notes: None,
        }
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    /// quantity × price, before fees. `None` when the product is out of range.
    pub fn gross(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }

    /// Cash paid on a BUY: gross plus fee.
    pub fn cost(&self) -> Option<Decimal> {
        self.gross()?.checked_add(self.fee)
    }

    /// Cash received on a SELL: gross minus fee.
    pub fn proceeds(&self) -> Option<Decimal> {
        self.gross()?.checked_sub(self.fee)
    }
}

fn deserialize_fee<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let fee = Option::<Decimal>::deserialize(deserializer)?;
    Ok(fee.unwrap_or(Decimal::ZERO))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Parse a trade date in ISO (`2024-03-15`) or day-first (`15/03/2024`) form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD or DD/MM/YYYY", s))
}

/// Parse a decimal cell, tolerating surrounding whitespace.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim()).map_err(|e| anyhow!("Invalid number '{}': {}", s.trim(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_new_normalizes_ticker() {
        let asset = Asset::new("a1", "  aapl ", dec!(150));
        assert_eq!(asset.ticker, "AAPL");
    }

    #[test]
    fn test_trade_type_parsing() {
        assert_eq!(TradeType::from_str("buy"), Ok(TradeType::Buy));
        assert_eq!(TradeType::from_str(" SELL "), Ok(TradeType::Sell));
        assert_eq!(TradeType::from_str("s"), Ok(TradeType::Sell));
        assert!(TradeType::from_str("dividend").is_err());
        assert_eq!(TradeType::Sell.as_str(), "SELL");
    }

    #[test]
    fn test_trade_cash_amounts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let trade = Trade::new("t1", "a1", TradeType::Buy, dec!(10), dec!(100), date)
            .with_fee(dec!(10));
        assert_eq!(trade.gross(), Some(dec!(1000)));
        assert_eq!(trade.cost(), Some(dec!(1010)));
        assert_eq!(trade.proceeds(), Some(dec!(990)));
    }

    #[test]
    fn test_trade_cash_amounts_out_of_range() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let trade = Trade::new("t1", "a1", TradeType::Buy, dec!(1e15), dec!(1e15), date);
        assert_eq!(trade.gross(), None);
        assert_eq!(trade.cost(), None);
        assert_eq!(trade.proceeds(), None);
    }

    #[test]
    fn test_trade_json_missing_or_null_fee_is_zero() {
        let json = r#"[
            {"id": "t1", "asset_id": "a1", "type": "BUY", "quantity": 10, "price": "100.5", "date": "2024-01-10"},
            {"id": "t2", "asset_id": "a1", "type": "SELL", "quantity": 5, "price": 120, "fee": null, "date": "11/01/2024"}
        ]"#;
        let trades: Vec<Trade> = serde_json::from_str(json).unwrap();
        assert_eq!(trades[0].fee, Decimal::ZERO);
        assert_eq!(trades[0].price, dec!(100.5));
        assert_eq!(trades[1].fee, Decimal::ZERO);
        assert_eq!(trades[1].trade_type, TradeType::Sell);
        assert_eq!(trades[1].date, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
    }

    #[test]
    fn test_asset_json_normalizes_ticker() {
        let json = r#"{"id": "a1", "ticker": "msft", "current_price": 410}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.ticker, "MSFT");
        assert_eq!(asset.asset_type, None);
        assert_eq!(asset.sector, None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_date("15/03/2024").unwrap(), expected);
        assert!(parse_date("March 15").is_err());
    }
}
