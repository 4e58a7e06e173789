//! Part-number normalization and price-cell parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalizes a part number into its match key.
///
/// Uppercases and removes hyphens and whitespace, so `"90915-yzzd1 "` and
/// `"90915YZZD1"` share the key `"90915YZZD1"`.
pub fn clean_sku(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Parses a price cell such as `"$1,234.50"` or `"MXN 99"`.
///
/// Returns `None` when the cell is not a non-negative decimal (e.g. `"N/A"`).
pub fn parse_price(text: &str) -> Option<Decimal> {
    let trimmed =
        text.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_alphabetic() || c == '$');

    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value)
}

/// Parses a price cell, treating anything unparseable as price unavailable (zero).
pub fn price_or_zero(text: &str) -> Decimal {
    parse_price(text).unwrap_or(Decimal::ZERO)
}
