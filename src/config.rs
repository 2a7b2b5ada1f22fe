//! Configuration file support
//!
//! Settings live in `<config_home>/folio/config.toml` unless a path is given
//! explicitly. A missing file means defaults; a malformed one is an error.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FolioError;
use crate::portfolio::LedgerOrder;

const APP_DIR: &str = "folio";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Order in which trades are folded into positions
    pub ledger_order: LedgerOrder,
    /// Prefix for money values in table output
    pub currency_symbol: String,
    pub decimal_places: u32,
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_order: LedgerOrder::AsGiven,
            currency_symbol: "$".to_string(),
            decimal_places: 2,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default config location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FolioError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&contents)
            .map_err(|e| FolioError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
