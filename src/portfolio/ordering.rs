use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

use crate::models::Trade;

/// Order in which the ledger is folded into positions.
///
/// The running average cost depends on the order of an asset's own trades.
/// `AsGiven` folds trades exactly as the data store returned them;
/// `Chronological` stable-sorts by trade date first, so trades sharing a date
/// keep their relative input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrder {
    #[default]
    AsGiven,
    Chronological,
}

impl LedgerOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerOrder::AsGiven => "as_given",
            LedgerOrder::Chronological => "chronological",
        }
    }

    /// Return the trades in folding order, borrowing when no reordering is needed.
    pub fn arrange<'a>(&self, trades: &'a [Trade]) -> Cow<'a, [Trade]> {
        match self {
            LedgerOrder::AsGiven => Cow::Borrowed(trades),
            LedgerOrder::Chronological => {
                if is_chronological(trades) {
                    return Cow::Borrowed(trades);
                }
                let mut sorted = trades.to_vec();
                sorted.sort_by_key(|t| t.date);
                Cow::Owned(sorted)
            }
        }
    }
}

impl FromStr for LedgerOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "as_given" | "given" | "input" => Ok(LedgerOrder::AsGiven),
            "chronological" | "date" => Ok(LedgerOrder::Chronological),
            _ => Err(()),
        }
    }
}

/// True when trade dates never decrease along the ledger.
pub fn is_chronological(trades: &[Trade]) -> bool {
    trades.windows(2).all(|pair| pair[0].date <= pair[1].date)
}
