//! Error handling for folio
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for ledger loading and configuration
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported file format: {0} (supported formats: .json, .csv)")]
    UnsupportedFormat(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for folio operations
pub type Result<T> = anyhow::Result<T>;
