//! The quote being built in one interactive session.

use crate::catalog::Catalog;
use crate::error::QuoteError;
use crate::quote::import::ImportEntry;
use crate::quote::models::{compute_totals, Availability, LineItem, QuoteTotals};
use crate::search::lookup_exact;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of a bulk add. Matched entries stay on the quote even when
/// others fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkAddReport {
    /// Number of line items appended
    pub added: usize,
    /// Raw SKUs with no catalog match, in input order
    pub unmatched: Vec<String>,
    /// Entries that matched but were refused (zero quantity, amount too large)
    pub rejected: Vec<String>,
}

/// Line items selected during one session. Owned by the session; never shared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuoteSession {
    items: Vec<LineItem>,
}

impl QuoteSession {
    /// Creates an empty quote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `sku` and appends a priced line item.
    ///
    /// `status` defaults to available. On error the quote is unchanged.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        sku: &str,
        quantity: u32,
        tax_rate: Decimal,
        status: Option<Availability>,
    ) -> Result<&LineItem, QuoteError> {
        let row = lookup_exact(catalog, sku)
            .ok_or_else(|| QuoteError::NotFound { sku: sku.to_string() })?;

        if quantity == 0 {
            return Err(QuoteError::InvalidQuantity { sku: sku.to_string(), quantity });
        }

        let item = LineItem::from_row(row, quantity, tax_rate, status.unwrap_or_default())
            .ok_or_else(|| QuoteError::AmountOverflow { sku: sku.to_string(), quantity })?;
        debug!("Added {} x{} ({})", item.sku, item.quantity, item.status);

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Adds every entry it can; failures are collected, not fatal.
    pub fn add_many(
        &mut self,
        catalog: &Catalog,
        entries: &[ImportEntry],
        tax_rate: Decimal,
    ) -> BulkAddReport {
        let mut report = BulkAddReport::default();

        for entry in entries {
            match self.add_item(catalog, &entry.sku, entry.quantity, tax_rate, entry.status) {
                Ok(_) => report.added += 1,
                Err(QuoteError::NotFound { sku }) => report.unmatched.push(sku),
                Err(e) => {
                    warn!("Skipping import entry: {}", e);
                    report.rejected.push(entry.sku.clone());
                }
            }
        }

        info!(
            "Bulk add: {} added, {} not found, {} rejected",
            report.added,
            report.unmatched.len(),
            report.rejected.len()
        );
        report
    }

    /// Current line items in the order they were added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Subtotal, tax and grand total for the current items.
    pub fn totals(&self) -> QuoteTotals {
        compute_totals(&self.items)
    }

    /// Removes every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items were added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
