//! Bulk-entry input: import files and `SKU[:QTY[:STATUS]]` specs.

use crate::catalog::loader::{read_text, TextEncoding};
use crate::catalog::schema::normalize_header;
use crate::quote::models::Availability;
use anyhow::{bail, Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const SKU_HEADERS: &[&str] = &["SKU", "PART", "NUM", "COD"];
const QUANTITY_HEADERS: &[&str] = &["CANT", "QTY", "QUANTITY"];
const STATUS_HEADERS: &[&str] = &["STATUS", "ESTATUS", "ESTADO"];

/// A part and quantity requested in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub sku: String,
    pub quantity: u32,
    /// Explicit status, if the source gave one
    #[serde(default)]
    pub status: Option<Availability>,
}

impl ImportEntry {
    /// An entry with quantity 1 and no explicit status.
    pub fn single(sku: impl Into<String>) -> Self {
        Self { sku: sku.into(), quantity: 1, status: None }
    }
}

impl FromStr for ImportEntry {
    type Err = String;

    /// Parses `SKU`, `SKU:QTY` or `SKU:QTY:STATUS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let sku = parts.next().unwrap_or_default().trim();
        if sku.is_empty() {
            return Err(format!("Missing part number in '{}'", s));
        }

        let quantity = match parts.next().map(str::trim) {
            None | Some("") => 1,
            Some(q) => parse_quantity(q).ok_or_else(|| format!("Invalid quantity in '{}'", s))?,
        };

        let status = match parts.next().map(str::trim) {
            None | Some("") => None,
            Some(st) => Some(st.parse::<Availability>()?),
        };

        Ok(Self { sku: sku.to_string(), quantity, status })
    }
}

/// Reads bulk entries from a CSV file (plain or zipped).
pub fn read_entries(path: &Path, encoding: TextEncoding) -> Result<Vec<ImportEntry>> {
    let text = read_text(path, encoding)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    parse_entries(&text).with_context(|| format!("Failed to parse import file: {}", path.display()))
}

/// Parses bulk entries from CSV text with a header row.
///
/// Needs a part-number column; quantity and status columns are optional.
/// A blank quantity means 1. Rows with an unreadable quantity are skipped.
pub fn parse_entries(text: &str) -> Result<Vec<ImportEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let Some(sku_col) = find_column(&headers, SKU_HEADERS) else {
        bail!("No part number column found among headers [{}]", headers.join(", "));
    };
    let qty_col = find_column(&headers, QUANTITY_HEADERS);
    let status_col = find_column(&headers, STATUS_HEADERS);

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let sku = record.get(sku_col).unwrap_or_default().trim();
        if sku.is_empty() {
            continue;
        }

        let quantity = match qty_col.and_then(|c| record.get(c)).map(str::trim) {
            None | Some("") => 1,
            Some(q) => match parse_quantity(q) {
                Some(q) => q,
                None => {
                    warn!("Row {}: unreadable quantity '{}' for {}, skipped", line + 2, q, sku);
                    continue;
                }
            },
        };

        let status = status_col
            .and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse::<Availability>() {
                Ok(status) => Some(status),
                Err(e) => {
                    warn!("Row {}: {}", line + 2, e);
                    None
                }
            });

        entries.push(ImportEntry { sku: sku.to_string(), quantity, status });
    }

    debug!("Parsed {} import entries", entries.len());
    Ok(entries)
}

/// Exact header match first, then substring.
fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    keywords
        .iter()
        .find_map(|k| headers.iter().position(|h| h == k))
        .or_else(|| keywords.iter().find_map(|k| headers.iter().position(|h| h.contains(k))))
}

/// Accepts whole numbers, including spreadsheet-style `"2.0"`.
fn parse_quantity(text: &str) -> Option<u32> {
    let value = Decimal::from_str(text.trim()).ok()?;
    if value.fract() != Decimal::ZERO || value.is_sign_negative() {
        return None;
    }
    value.to_u32()
}
