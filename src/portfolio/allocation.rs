use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use super::position::{percentage, Position};

pub const DEFAULT_ASSET_TYPE_LABEL: &str = "Others";
pub const DEFAULT_SECTOR_LABEL: &str = "General";

/// One category of an allocation breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationSlice {
    pub name: String,
    pub value: Decimal,
    /// Share of total portfolio value, 0..100
    pub percentage: Decimal,
}

/// Group position value by asset type ("Others" when unclassified).
pub fn group_by_asset_type<'a, I>(positions: I, total_value: Decimal) -> Vec<AllocationSlice>
where
    I: IntoIterator<Item = &'a Position>,
{
    group_by(positions, total_value, |p| {
        label_or(p.asset.asset_type.as_deref(), DEFAULT_ASSET_TYPE_LABEL)
    })
}

/// Group position value by sector ("General" when unclassified).
pub fn group_by_sector<'a, I>(positions: I, total_value: Decimal) -> Vec<AllocationSlice>
where
    I: IntoIterator<Item = &'a Position>,
{
    group_by(positions, total_value, |p| {
        label_or(p.asset.sector.as_deref(), DEFAULT_SECTOR_LABEL)
    })
}

fn label_or(label: Option<&str>, default: &str) -> String {
    match label.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => default.to_string(),
    }
}

fn group_by<'a, I, F>(positions: I, total_value: Decimal, key: F) -> Vec<AllocationSlice>
where
    I: IntoIterator<Item = &'a Position>,
    F: Fn(&Position) -> String,
{
    let mut groups: HashMap<String, Decimal> = HashMap::new();
    for position in positions {
        let value = groups.entry(key(position)).or_insert(Decimal::ZERO);
        *value = value.saturating_add(position.current_value);
    }

    groups
        .into_iter()
        .map(|(name, value)| AllocationSlice {
            name,
            value,
            percentage: percentage(value, total_value),
        })
        .sorted_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)))
        .collect()
}
