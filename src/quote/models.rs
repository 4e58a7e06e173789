//! Quote line items, availability status and totals.

use crate::catalog::CatalogRow;
use crate::money::round_cents;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock status shown on a quote line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    /// Not in stock, expected to arrive
    BackOrder,
    Unavailable,
}

impl Availability {
    /// Uppercase label used on printed documents.
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::BackOrder => "BACK ORDER",
            Availability::Unavailable => "UNAVAILABLE",
        }
    }

    /// Margin marker flagging lines that need attention.
    pub fn marker(&self) -> char {
        match self {
            Availability::Available => ' ',
            Availability::BackOrder => '*',
            Availability::Unavailable => '!',
        }
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "available" | "disponible" | "instock" => Ok(Availability::Available),
            "backorder" | "backordered" | "pedido" | "sobrepedido" => Ok(Availability::BackOrder),
            "unavailable" | "nodisponible" | "agotado" | "outofstock" => {
                Ok(Availability::Unavailable)
            }
            _ => Err(format!("Unknown status: {}. Use: available, back-order, unavailable", s)),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::BackOrder => write!(f, "back-order"),
            Availability::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// One part on a quote. Built once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub description: String,
    pub quantity: u32,
    /// Unit price before tax
    pub base_price: Decimal,
    /// Tax on the whole line, rounded to cents
    pub tax_amount: Decimal,
    /// Line subtotal plus tax
    pub total_amount: Decimal,
    pub status: Availability,
}

impl LineItem {
    /// Prices `quantity` units of a catalog row at `tax_rate`.
    ///
    /// Returns `None` when an amount does not fit in a `Decimal`.
    pub fn from_row(
        row: &CatalogRow,
        quantity: u32,
        tax_rate: Decimal,
        status: Availability,
    ) -> Option<Self> {
        let subtotal = row.base_price.checked_mul(Decimal::from(quantity))?;
        let tax_amount = round_cents(subtotal.checked_mul(tax_rate)?);
        let total_amount = subtotal.checked_add(tax_amount)?;
        Some(Self {
            sku: row.sku.clone(),
            description: row.description.clone(),
            quantity,
            base_price: row.base_price,
            tax_amount,
            total_amount,
            status,
        })
    }

    /// Unit price times quantity, before tax.
    pub fn line_subtotal(&self) -> Decimal {
        self.base_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Aggregate amounts for a set of line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
}

/// Sums line items. Recomputed on demand, never cached.
///
/// Sums saturate at `Decimal::MAX` instead of overflowing.
pub fn compute_totals(items: &[LineItem]) -> QuoteTotals {
    let subtotal =
        items.iter().map(LineItem::line_subtotal).fold(Decimal::ZERO, Decimal::saturating_add);
    let total_tax =
        items.iter().map(|i| i.tax_amount).fold(Decimal::ZERO, Decimal::saturating_add);
    QuoteTotals { subtotal, total_tax, grand_total: subtotal.saturating_add(total_tax) }
}

/// Who and what a quote document is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteHeader {
    pub customer: String,
    /// Plate or VIN
    pub vehicle_id: String,
    pub order_number: String,
}
