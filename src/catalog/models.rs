//! Catalog rows and the immutable, indexed catalog built from them.

use crate::catalog::sku::clean_sku;
use crate::money::round_cents;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A single part in the price catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Part number as written in the price file
    pub sku: String,
    /// Match key: uppercase, no hyphens or whitespace
    pub clean_sku: String,
    /// Part description
    pub description: String,
    /// Price before tax; zero when the price file had no usable price
    pub base_price: Decimal,
    /// Every cell of the source row in header order
    pub fields: Vec<String>,
}

impl CatalogRow {
    /// Creates a row from its three core values.
    pub fn new(sku: impl Into<String>, description: impl Into<String>, base_price: Decimal) -> Self {
        let sku = sku.into();
        let description = description.into();
        Self {
            clean_sku: clean_sku(&sku),
            fields: vec![sku.clone(), description.clone(), base_price.to_string()],
            sku,
            description,
            base_price,
        }
    }

    /// Returns false when the price file had no usable price for this part.
    pub fn has_price(&self) -> bool {
        !self.base_price.is_zero()
    }

    /// Tax on one unit, rounded to cents.
    pub fn unit_tax(&self, tax_rate: Decimal) -> Decimal {
        round_cents(self.base_price * tax_rate)
    }

    /// Tax-inclusive price of one unit.
    pub fn price_with_tax(&self, tax_rate: Decimal) -> Decimal {
        self.base_price.saturating_add(self.unit_tax(tax_rate))
    }

    /// Case-insensitive substring match over every column.
    ///
    /// `needle` must already be lowercase.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.fields.iter().any(|f| f.to_lowercase().contains(needle))
            || self.clean_sku.to_lowercase().contains(needle)
            || self.base_price.to_string().contains(needle)
    }
}

/// The loaded price catalog. Never mutated once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    headers: Vec<String>,
    rows: Vec<CatalogRow>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, keeping the first row for each match key.
    ///
    /// Rows without a part number share the empty key: the first one is
    /// kept for search but left out of the lookup index.
    pub fn from_rows(headers: Vec<String>, rows: impl IntoIterator<Item = CatalogRow>) -> Self {
        let mut kept = Vec::new();
        let mut index = HashMap::new();
        let mut unkeyed_kept = false;
        let mut duplicates = 0usize;

        for row in rows {
            if row.clean_sku.is_empty() {
                if unkeyed_kept {
                    duplicates += 1;
                } else {
                    unkeyed_kept = true;
                    kept.push(row);
                }
                continue;
            }
            if index.contains_key(&row.clean_sku) {
                duplicates += 1;
                continue;
            }
            index.insert(row.clean_sku.clone(), kept.len());
            kept.push(row);
        }

        if duplicates > 0 {
            debug!("Catalog: kept {} rows, dropped {} duplicates", kept.len(), duplicates);
        }

        Self { headers, rows: kept, index }
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Normalized header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the catalog has no parts.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a row by an already-cleaned match key.
    pub fn get(&self, clean_key: &str) -> Option<&CatalogRow> {
        self.index.get(clean_key).map(|&i| &self.rows[i])
    }
}
