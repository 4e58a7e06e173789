//! Hides parts the price file has no usable price for.

use super::Filter;
use crate::catalog::CatalogRow;

/// Keeps only rows with a non-zero price.
pub struct PricedFilter;

impl PricedFilter {
    /// Creates a new priced-only filter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PricedFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for PricedFilter {
    fn matches(&self, row: &CatalogRow) -> bool {
        row.has_price()
    }

    fn description(&self) -> String {
        "Priced only".to_string()
    }
}
