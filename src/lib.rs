//! Folio - personal investment portfolio tracker
//!
//! This library derives current holdings, fee-inclusive average cost,
//! unrealized P&L and allocation breakdowns from an asset catalog and a
//! BUY/SELL trade ledger.

pub mod cli;
pub mod config;
pub mod error;
pub mod importers;
pub mod models;
pub mod portfolio;
pub mod utils;
