//! Base-price range filter.

use super::Filter;
use crate::catalog::CatalogRow;
use crate::money::format_money;
use rust_decimal::Decimal;

/// Filters rows by base price (before tax).
pub struct PriceFilter {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// Creates a filter with both min and max.
    pub fn range(min: Decimal, max: Decimal) -> Self {
        Self { min: Some(min), max: Some(max) }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, row: &CatalogRow) -> bool {
        // Unpriced parts stay visible; staff still need to find them
        if !row.has_price() {
            return true;
        }

        let price = row.base_price;
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("Price: {} - {}", format_money(min), format_money(max))
            }
            (Some(min), None) => format!("Price: >= {}", format_money(min)),
            (None, Some(max)) => format!("Price: <= {}", format_money(max)),
            (None, None) => "Price: any".to_string(),
        }
    }
}
