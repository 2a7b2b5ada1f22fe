//! Ledger validation module
//!
//! Checks a loaded asset catalog and trade ledger for data-integrity problems,
//! collecting every issue instead of failing on the first one. Validation never
//! filters the ledger: the aggregator still sees every trade and applies its own
//! skip rules, so the report only explains what the numbers will look like.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::models::{Asset, Trade, TradeType};
use crate::portfolio::ordering::is_chronological;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation issue found in the catalog or the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Id of the offending asset or trade, if the issue is about one record
    pub record_id: Option<String>,
    /// Field name that has the issue (e.g., "quantity", "asset_id")
    pub field: String,
    /// The problematic value
    pub value: String,
    /// Description of why this is an issue
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            record_id: None,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn for_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

/// All issues found in one ledger snapshot
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Count issues by severity for summary reporting
    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_insert(0) += 1;
        }
        counts
    }
}

/// Validate an asset catalog and a trade ledger (in folding order)
pub fn validate_ledger(assets: &[Asset], trades: &[Trade]) -> ValidationReport {
    let mut issues = validate_assets(assets);
    let known: HashSet<&str> = assets.iter().map(|a| a.id.as_str()).collect();
    issues.extend(validate_trades(&known, trades));

    if !is_chronological(trades) {
        issues.push(ValidationIssue::new(
            Severity::Info,
            "date",
            "",
            "Ledger is not in chronological order; average cost follows ledger order",
        ));
    }

    ValidationReport { issues }
}

fn validate_assets(assets: &[Asset]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_tickers = HashSet::new();

    for asset in assets {
        if !seen_ids.insert(asset.id.as_str()) {
            issues.push(
                ValidationIssue::new(Severity::Error, "id", &asset.id, "Duplicate asset id")
                    .for_record(&asset.id),
            );
        }

        if !seen_tickers.insert(asset.ticker.as_str()) {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "ticker",
                    &asset.ticker,
                    "Ticker is already used by another asset",
                )
                .for_record(&asset.id),
            );
        }

        if asset.current_price < Decimal::ZERO {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "current_price",
                    asset.current_price.to_string(),
                    "Current price cannot be negative",
                )
                .for_record(&asset.id),
            );
        }
    }

    issues
}

fn validate_trades(known: &HashSet<&str>, trades: &[Trade]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut held: HashMap<&str, Decimal> = HashMap::new();

    for trade in trades {
        if trade.quantity <= Decimal::ZERO {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "quantity",
                    trade.quantity.to_string(),
                    "Quantity must be greater than zero",
                )
                .for_record(&trade.id),
            );
        }

        if trade.price < Decimal::ZERO {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "price",
                    trade.price.to_string(),
                    "Price cannot be negative",
                )
                .for_record(&trade.id),
            );
        }

        if trade.fee < Decimal::ZERO {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "fee",
                    trade.fee.to_string(),
                    "Fee cannot be negative",
                )
                .for_record(&trade.id),
            );
        }

        if trade.cost().is_none() || trade.proceeds().is_none() {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    "quantity",
                    format!("{} x {}", trade.quantity, trade.price),
                    "Trade amount is out of range; trade will be ignored",
                )
                .for_record(&trade.id),
            );
        }

        if !known.contains(trade.asset_id.as_str()) {
            issues.push(
                ValidationIssue::new(
                    Severity::Warning,
                    "asset_id",
                    &trade.asset_id,
                    "Unknown asset; trade will be ignored",
                )
                .for_record(&trade.id),
            );
            continue;
        }

        let quantity = held.entry(trade.asset_id.as_str()).or_insert(Decimal::ZERO);
        match trade.trade_type {
            TradeType::Buy => *quantity = quantity.saturating_add(trade.quantity),
            TradeType::Sell => {
                let before = *quantity;
                *quantity = quantity.saturating_sub(trade.quantity);
                if *quantity < Decimal::ZERO {
                    issues.push(
                        ValidationIssue::new(
                            Severity::Warning,
                            "quantity",
                            trade.quantity.to_string(),
                            format!(
                                "Sells more units than held ({}); position will be hidden",
                                before
                            ),
                        )
                        .for_record(&trade.id),
                    );
                }
            }
        }
    }

    issues
}
