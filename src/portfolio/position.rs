use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Asset, Trade, TradeType};

/// Average-cost state for a single asset while the ledger is being folded
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunningPosition {
    pub quantity: Decimal,
    pub avg_buy_price: Decimal,
    pub total_invested: Decimal,
}

impl RunningPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a purchase into the weighted average. The fee is part of the cost basis.
    pub fn after_buy(&self, trade: &Trade) -> Option<Self> {
        let cost = trade.cost()?;
        let new_total_cost = self
            .quantity
            .checked_mul(self.avg_buy_price)?
            .checked_add(cost)?;
        let new_quantity = self.quantity.checked_add(trade.quantity)?;

        let avg_buy_price = if new_quantity > Decimal::ZERO {
            new_total_cost.checked_div(new_quantity)?
        } else {
            Decimal::ZERO
        };

        Some(Self {
            quantity: new_quantity,
            avg_buy_price,
            total_invested: self.total_invested.checked_add(cost)?,
        })
    }

    /// Remove sold units at the current average. The average itself never moves
    /// on a sale, and quantity is allowed to go negative.
    pub fn after_sell(&self, trade: &Trade) -> Option<Self> {
        let cost_basis_removed = trade
            .quantity
            .checked_mul(self.avg_buy_price)?
            .checked_add(trade.fee)?;

        Some(Self {
            quantity: self.quantity.checked_sub(trade.quantity)?,
            avg_buy_price: self.avg_buy_price,
            total_invested: self.total_invested.checked_sub(cost_basis_removed)?,
        })
    }

    /// State after `trade`, or `None` if any step leaves the `Decimal` range.
    pub fn after(&self, trade: &Trade) -> Option<Self> {
        match trade.trade_type {
            TradeType::Buy => self.after_buy(trade),
            TradeType::Sell => self.after_sell(trade),
        }
    }

    pub fn is_open(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

/// Current holding of one asset, derived from the ledger
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Position {
    pub asset: Asset,
    pub quantity: Decimal,
    pub avg_buy_price: Decimal,
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub unrealized_pnl_pct: Decimal,
    /// Share of total portfolio value, 0..100
    pub allocation: Decimal,
}

impl Position {
    /// Value an open running position at the asset's current price.
    /// Allocation is left at zero until the portfolio total is known.
    pub(crate) fn from_running(asset: &Asset, running: &RunningPosition) -> Self {
        let current_value = running.quantity.saturating_mul(asset.current_price);
        let unrealized_pnl = current_value.saturating_sub(running.total_invested);

        Self {
            asset: asset.clone(),
            quantity: running.quantity,
            avg_buy_price: running.avg_buy_price,
            total_invested: running.total_invested,
            current_value,
            unrealized_pnl,
            unrealized_pnl_pct: percentage(unrealized_pnl, running.total_invested),
            allocation: Decimal::ZERO,
        }
    }
}

/// `part / whole × 100`, or zero when `whole` is not positive.
/// Saturates at the `Decimal` bounds.
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match part.checked_div(whole) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None if part.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}
