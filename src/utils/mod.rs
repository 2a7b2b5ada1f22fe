//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of money, percentages and quantities throughout the CLI.

use rust_decimal::{Decimal, RoundingStrategy};

/// Core formatting function with full control over output.
///
/// Formats a Decimal value with `,` thousands separators and `.` as the
/// decimal separator, rounded half-away-from-zero to `places`.
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `places` - Number of decimal places
/// * `width` - Minimum width for padding (0 for no padding, right-aligned)
/// * `symbol` - Prefix such as `"$"` (empty for none)
///
/// # Examples
/// ```
/// use folio::utils::format_money_with_width;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_money_with_width(dec!(1234.56), 2, 0, "$"), "$1,234.56");
/// assert_eq!(format_money_with_width(dec!(1234), 2, 12, ""), "    1,234.00");
/// ```
pub fn format_money_with_width(value: Decimal, places: u32, width: usize, symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.*}", places as usize, rounded.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let with_separators = group_thousands(integer_part);

    let sign = if is_negative { "-" } else { "" };
    let result = match decimal_part {
        Some(dec) => format!("{}{}{}.{}", sign, symbol, with_separators, dec),
        None => format!("{}{}{}", sign, symbol, with_separators),
    };

    if width > 0 && result.chars().count() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format money with a symbol at `places` decimals: "$1,234.56"
///
/// # Examples
/// ```
/// use folio::utils::format_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_money(dec!(1234.56), 2, "$"), "$1,234.56");
/// assert_eq!(format_money(dec!(-500), 2, "€"), "-€500.00");
/// assert_eq!(format_money(dec!(1.23456), 4, "$"), "$1.2346");
/// ```
pub fn format_money(value: Decimal, places: u32, symbol: &str) -> String {
    format_money_with_width(value, places, 0, symbol)
}

/// Format a percentage in the 0..100 scale: "48.51%"
pub fn format_percent(value: Decimal, places: u32) -> String {
    format!("{}%", format_money_with_width(value, places, 0, ""))
}

/// Quantities print without trailing zeros: 10.500 → "10.5"
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money_basic() {
        assert_eq!(format_money(dec!(1234.56), 2, "$"), "$1,234.56");
        assert_eq!(format_money(dec!(0.99), 2, "$"), "$0.99");
        assert_eq!(format_money(dec!(1000000), 2, "$"), "$1,000,000.00");
    }

    #[test]
    fn test_format_money_small_values() {
        assert_eq!(format_money(dec!(0), 2, "$"), "$0.00");
        assert_eq!(format_money(dec!(12), 2, "$"), "$12.00");
        assert_eq!(format_money(dec!(999.99), 2, "$"), "$999.99");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(dec!(-1234.56), 2, "$"), "-$1,234.56");
        assert_eq!(format_money(dec!(-0.004), 2, "$"), "$0.00");
    }

    #[test]
    fn test_format_money_respects_places() {
        assert_eq!(format_money(dec!(1.23456), 4, "$"), "$1.2346");
        assert_eq!(format_money(dec!(1234.5), 0, "$"), "$1,235");
        assert_eq!(format_money(dec!(7), 3, ""), "7.000");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_money(dec!(1.235), 2, ""), "1.24");
        assert_eq!(format_money(dec!(101.0049), 2, ""), "101.00");
    }

    #[test]
    fn test_format_with_width() {
        let result = format_money_with_width(dec!(100), 2, 10, "$");
        assert_eq!(result, "   $100.00");

        let result = format_money_with_width(dec!(1000000), 2, 5, "$");
        assert_eq!(result, "$1,000,000.00");
    }

    #[test]
    fn test_zero_places() {
        assert_eq!(format_money_with_width(dec!(1234.5), 0, 0, ""), "1,235");
    }

    #[test]
    fn test_format_percent_and_quantity() {
        assert_eq!(format_percent(dec!(48.514851), 2), "48.51%");
        assert_eq!(format_percent(dec!(-3.5), 1), "-3.5%");
        assert_eq!(format_quantity(dec!(10.500)), "10.5");
        assert_eq!(format_quantity(dec!(20)), "20");
    }
}
