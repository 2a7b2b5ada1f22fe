// Portfolio module - positions, average cost, unrealized P&L and allocation

pub mod aggregator;
pub mod allocation;
pub mod ordering;
pub mod position;

pub use aggregator::{aggregate, aggregate_with, PortfolioSummary};
pub use allocation::{group_by_asset_type, group_by_sector, AllocationSlice};
pub use ordering::LedgerOrder;
pub use position::Position;
