use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use super::allocation::{group_by_asset_type, group_by_sector, AllocationSlice};
use super::ordering::LedgerOrder;
use super::position::{percentage, Position, RunningPosition};
use crate::models::{Asset, Trade, TradeType};

/// Complete portfolio view derived from an asset catalog and a trade ledger
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PortfolioSummary {
    /// Open positions (net quantity > 0) keyed by asset id
    pub positions: BTreeMap<String, Position>,
    pub total_portfolio_value: Decimal,
    pub total_capital_invested: Decimal,
    pub total_profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
    /// Cumulative BUY outlay (quantity × price + fee) across the ledger
    pub total_invested_with_fees: Decimal,
    /// Cumulative SELL proceeds (quantity × price − fee) across the ledger
    pub total_returned: Decimal,
    pub by_asset_type: Vec<AllocationSlice>,
    pub by_sector: Vec<AllocationSlice>,
    /// Trades ignored because their asset is not in the catalog
    pub skipped_trades: usize,
    /// Trades ignored because folding them would overflow `Decimal`
    pub out_of_range_trades: usize,
}

impl PortfolioSummary {
    pub fn position(&self, asset_id: &str) -> Option<&Position> {
        self.positions.get(asset_id)
    }

    /// Positions by current value, largest first (ties broken by ticker).
    pub fn ranked(&self) -> Vec<&Position> {
        let mut ranked: Vec<&Position> = self.positions.values().collect();
        ranked.sort_by(|a, b| {
            b.current_value
                .cmp(&a.current_value)
                .then_with(|| a.asset.ticker.cmp(&b.asset.ticker))
        });
        ranked
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Fold the ledger in the order given.
pub fn aggregate(assets: &[Asset], trades: &[Trade]) -> PortfolioSummary {
    aggregate_with(assets, trades, LedgerOrder::AsGiven)
}

/// Fold the ledger after arranging it according to `order`.
pub fn aggregate_with(assets: &[Asset], trades: &[Trade], order: LedgerOrder) -> PortfolioSummary {
    let catalog: HashMap<&str, &Asset> = assets.iter().map(|a| (a.id.as_str(), a)).collect();
    let ledger = order.arrange(trades);

    // Fold: per-asset running state plus the two global accumulators
    let mut running: HashMap<&str, RunningPosition> = HashMap::new();
    let mut total_invested_with_fees = Decimal::ZERO;
    let mut total_returned = Decimal::ZERO;
    let mut skipped_trades = 0;
    let mut out_of_range_trades = 0;

    for trade in ledger.iter() {
        let Some(asset) = catalog.get(trade.asset_id.as_str()) else {
            debug!(
                "Skipping trade {}: unknown asset {}",
                trade.id, trade.asset_id
            );
            skipped_trades += 1;
            continue;
        };

        // A trade is folded whole or not at all
        let state = running.get(asset.id.as_str()).cloned().unwrap_or_default();
        let folded = state.after(trade).and_then(|next| match trade.trade_type {
            TradeType::Buy => trade
                .cost()
                .and_then(|cost| total_invested_with_fees.checked_add(cost))
                .map(|invested| (next, invested, total_returned)),
            TradeType::Sell => trade
                .proceeds()
                .and_then(|proceeds| total_returned.checked_add(proceeds))
                .map(|returned| (next, total_invested_with_fees, returned)),
        });

        let Some((next, invested, returned)) = folded else {
            warn!(
                "Skipping trade {}: amounts out of range (quantity {}, price {})",
                trade.id, trade.quantity, trade.price
            );
            out_of_range_trades += 1;
            continue;
        };

        running.insert(asset.id.as_str(), next);
        total_invested_with_fees = invested;
        total_returned = returned;
    }

    // Value every open position
    let mut positions: BTreeMap<String, Position> = running
        .iter()
        .filter(|(_, state)| state.is_open())
        .filter_map(|(id, state)| {
            catalog
                .get(id)
                .map(|asset| (id.to_string(), Position::from_running(asset, state)))
        })
        .collect();

    let total_portfolio_value = positions
        .values()
        .fold(Decimal::ZERO, |total, p| total.saturating_add(p.current_value));

    // Allocation needs the grand total
    for position in positions.values_mut() {
        position.allocation = percentage(position.current_value, total_portfolio_value);
    }

    let total_capital_invested = total_invested_with_fees.saturating_sub(total_returned);
    let total_profit_loss = total_portfolio_value.saturating_sub(total_capital_invested);

    let summary = PortfolioSummary {
        by_asset_type: group_by_asset_type(positions.values(), total_portfolio_value),
        by_sector: group_by_sector(positions.values(), total_portfolio_value),
        positions,
        total_portfolio_value,
        total_capital_invested,
        total_profit_loss,
        profit_loss_percentage: percentage(total_profit_loss, total_capital_invested),
        total_invested_with_fees,
        total_returned,
        skipped_trades,
        out_of_range_trades,
    };

    info!(
        "Aggregated {} trades into {} open positions ({} skipped, {} out of range, order: {})",
        trades.len(),
        summary.positions.len(),
        summary.skipped_trades,
        summary.out_of_range_trades,
        order.as_str()
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn buy(id: &str, asset: &str, qty: Decimal, price: Decimal, d: u32) -> Trade {
        Trade::new(id, asset, TradeType::Buy, qty, price, day(d))
    }

    fn sell(id: &str, asset: &str, qty: Decimal, price: Decimal, d: u32) -> Trade {
        Trade::new(id, asset, TradeType::Sell, qty, price, day(d))
    }

    #[test]
    fn test_empty_ledger() {
        let assets = vec![Asset::new("a1", "AAPL", dec!(150))];
        let summary = aggregate(&assets, &[]);

        assert!(summary.is_empty());
        assert_eq!(summary.total_portfolio_value, Decimal::ZERO);
        assert_eq!(summary.total_capital_invested, Decimal::ZERO);
        assert_eq!(summary.total_profit_loss, Decimal::ZERO);
        assert_eq!(summary.profit_loss_percentage, Decimal::ZERO);
        assert!(summary.by_asset_type.is_empty());
        assert!(summary.by_sector.is_empty());
    }

    #[test]
    fn test_single_buy_with_fee() {
        let assets = vec![Asset::new("a1", "AAPL", dec!(150))];
        let trades = vec![buy("t1", "a1", dec!(10), dec!(100), 1).with_fee(dec!(10))];
        let summary = aggregate(&assets, &trades);

        let position = summary.position("a1").unwrap();
        assert_eq!(position.quantity, dec!(10));
        assert_eq!(position.avg_buy_price, dec!(101));
        assert_eq!(position.total_invested, dec!(1010));
        assert_eq!(position.current_value, dec!(1500));
        assert_eq!(position.unrealized_pnl, dec!(490));
        assert_eq!(position.unrealized_pnl_pct.round_dp(2), dec!(48.51));
        assert_eq!(position.allocation, dec!(100));

        assert_eq!(summary.total_portfolio_value, dec!(1500));
        assert_eq!(summary.total_capital_invested, dec!(1010));
        assert_eq!(summary.total_profit_loss, dec!(490));
    }

    #[test]
    fn test_full_sell_removes_position_but_counts_proceeds() {
        let assets = vec![Asset::new("a1", "AAPL", dec!(150))];
        let trades = vec![
            buy("t1", "a1", dec!(10), dec!(100), 1),
            sell("t2", "a1", dec!(10), dec!(150), 2),
        ];
        let summary = aggregate(&assets, &trades);

        assert!(summary.position("a1").is_none());
        assert_eq!(summary.total_returned, dec!(1500));
        assert_eq!(summary.total_invested_with_fees, dec!(1000));
        assert_eq!(summary.total_capital_invested, dec!(-500));
        // capital invested is negative, so the percentage falls back to zero
        assert_eq!(summary.total_profit_loss, dec!(500));
        assert_eq!(summary.profit_loss_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_oversell_is_excluded_not_an_error() {
        let assets = vec![
            Asset::new("a1", "AAPL", dec!(150)),
            Asset::new("a2", "MSFT", dec!(400)),
        ];
        let trades = vec![
            buy("t1", "a1", dec!(5), dec!(100), 1),
            sell("t2", "a1", dec!(8), dec!(120), 2),
            buy("t3", "a2", dec!(1), dec!(300), 3),
        ];
        let summary = aggregate(&assets, &trades);

        assert!(summary.position("a1").is_none());
        assert_eq!(summary.positions.len(), 1);
        assert_eq!(summary.total_portfolio_value, dec!(400));
        // 500 + 300 bought, 960 returned
        assert_eq!(summary.total_capital_invested, dec!(-160));
    }

    #[test]
    fn test_unknown_asset_trades_are_skipped() {
        let assets = vec![Asset::new("a1", "AAPL", dec!(100))];
        let trades = vec![
            buy("t1", "ghost", dec!(50), dec!(10), 1),
            buy("t2", "a1", dec!(1), dec!(100), 2),
            sell("t3", "ghost", dec!(50), dec!(10), 3),
        ];
        let summary = aggregate(&assets, &trades);

        assert_eq!(summary.skipped_trades, 2);
        assert_eq!(summary.positions.len(), 1);
        assert_eq!(summary.total_capital_invested, dec!(100));
        assert_eq!(summary.total_returned, Decimal::ZERO);
    }

    #[test]
    fn test_asset_without_trades_has_no_position() {
        let assets = vec![
            Asset::new("a1", "AAPL", dec!(100)),
            Asset::new("a2", "IDLE", dec!(50)),
        ];
        let trades = vec![buy("t1", "a1", dec!(1), dec!(100), 1)];
        let summary = aggregate(&assets, &trades);

        assert!(summary.position("a2").is_none());
        assert_eq!(summary.positions.len(), 1);
    }

    #[test]
    fn test_allocation_and_ranking() {
        let assets = vec![
            Asset::new("a1", "AAPL", dec!(100)).with_asset_type("Stock"),
            Asset::new("a2", "BTC", dec!(300)).with_asset_type("Crypto"),
        ];
        let trades = vec![
            buy("t1", "a1", dec!(1), dec!(90), 1),
            buy("t2", "a2", dec!(1), dec!(200), 2),
        ];
        let summary = aggregate(&assets, &trades);

        assert_eq!(summary.position("a1").unwrap().allocation, dec!(25));
        assert_eq!(summary.position("a2").unwrap().allocation, dec!(75));

        let ranked = summary.ranked();
        let tickers: Vec<_> = ranked.iter().map(|p| p.asset.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BTC", "AAPL"]);

        assert_eq!(summary.by_asset_type[0].name, "Crypto");
        assert_eq!(summary.by_sector.len(), 1);
        assert_eq!(summary.by_sector[0].name, "General");
        assert_eq!(summary.by_sector[0].percentage, dec!(100));
    }

    #[test]
    fn test_ledger_order_changes_running_average() {
        let assets = vec![Asset::new("a1", "AAPL", dec!(100))];
        // Newest first, as the data store commonly returns them
        let trades = vec![
            buy("t3", "a1", dec!(10), dec!(300), 3),
            sell("t2", "a1", dec!(5), dec!(150), 2),
            buy("t1", "a1", dec!(5), dec!(100), 1),
        ];

        let as_given = aggregate(&assets, &trades);
        let chronological = aggregate_with(&assets, &trades, LedgerOrder::Chronological);

        let given_pos = as_given.position("a1").unwrap();
        let chrono_pos = chronological.position("a1").unwrap();
        assert_eq!(given_pos.quantity, dec!(10));
        assert_eq!(chrono_pos.quantity, dec!(10));
        // As given: 5 units left at 300, then 5 more at 100
        assert_eq!(given_pos.avg_buy_price, dec!(200));
        assert_eq!(chrono_pos.avg_buy_price, dec!(300));
        // Global totals do not depend on order
        assert_eq!(
            as_given.total_capital_invested,
            chronological.total_capital_invested
        );
    }

    #[test]
    fn test_out_of_range_trade_is_skipped_and_counted() {
        let assets = vec![
            Asset::new("a1", "BIG", dec!(1e15)),
            Asset::new("a2", "VTI", dec!(250)),
        ];
        let trades = vec![
            buy("t1", "a2", dec!(4), dec!(200), 1),
            buy("t2", "a1", dec!(1e15), dec!(1e15), 2),
            buy("t3", "a1", dec!(2), dec!(10), 3),
        ];

        let summary = aggregate(&assets, &trades);

        assert_eq!(summary.out_of_range_trades, 1);
        assert_eq!(summary.skipped_trades, 0);
        // Only t3 reached a1; the overflowing buy left no trace
        let big = summary.position("a1").unwrap();
        assert_eq!(big.quantity, dec!(2));
        assert_eq!(big.avg_buy_price, dec!(10));
        assert_eq!(summary.total_invested_with_fees, dec!(820));
        assert_eq!(summary.total_capital_invested, dec!(820));
    }
}
