//! Header-row schema inference.
//!
//! Price files come from different suppliers with different header names
//! ("NUM PARTE", "PART NUMBER", "CODIGO"...). Columns are identified by
//! keyword, with explicit overrides from configuration taking precedence.
//!
//! Resolution order for each role:
//! 1. A configured override must name an existing header exactly
//!    (after trimming and uppercasing) that no earlier role holds,
//!    otherwise inference fails.
//! 2. Keywords are tried in priority order; for the first keyword that
//!    matches any free header, the leftmost such header wins.
//! 3. Roles resolve to distinct columns (part number, then description,
//!    then price).
//!
//! Ambiguous matches are logged so a surprising pick is visible.

use crate::error::{ColumnRole, SchemaError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Keywords identifying the part-number column, highest priority first.
pub const SKU_KEYWORDS: &[&str] = &["PART", "NUM", "COD"];

/// Keywords identifying the description column.
pub const DESCRIPTION_KEYWORDS: &[&str] = &["DESC"];

/// Keywords identifying the price column, highest priority first.
pub const PRICE_KEYWORDS: &[&str] = &["PRICE", "PRECIO", "PUBLICO"];

/// Explicit header names that bypass keyword inference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOverrides {
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<String>,
}

/// Resolved column positions for a catalog header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    /// Normalized headers (trimmed, uppercased) in file order.
    pub headers: Vec<String>,
    pub sku: usize,
    pub description: usize,
    pub price: usize,
}

/// Trims and uppercases a header cell, dropping a stray byte-order mark.
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_uppercase()
}

impl ColumnMap {
    /// Infers the column mapping from a raw header row.
    pub fn infer(raw_headers: &[String], overrides: &ColumnOverrides) -> Result<Self, SchemaError> {
        let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();

        let mut taken: Vec<(ColumnRole, usize)> = Vec::with_capacity(2);
        let sku =
            resolve(ColumnRole::Sku, &headers, overrides.sku.as_deref(), SKU_KEYWORDS, &taken)?;
        taken.push((ColumnRole::Sku, sku));

        let description = resolve(
            ColumnRole::Description,
            &headers,
            overrides.description.as_deref(),
            DESCRIPTION_KEYWORDS,
            &taken,
        )?;
        taken.push((ColumnRole::Description, description));

        let price = resolve(
            ColumnRole::Price,
            &headers,
            overrides.price.as_deref(),
            PRICE_KEYWORDS,
            &taken,
        )?;

        debug!(
            "Schema: sku='{}' description='{}' price='{}'",
            headers[sku], headers[description], headers[price]
        );

        Ok(Self { headers, sku, description, price })
    }

    /// Column position for a role.
    pub fn index(&self, role: ColumnRole) -> usize {
        match role {
            ColumnRole::Sku => self.sku,
            ColumnRole::Description => self.description,
            ColumnRole::Price => self.price,
        }
    }

    /// Header name for a role.
    pub fn header(&self, role: ColumnRole) -> &str {
        &self.headers[self.index(role)]
    }
}

fn resolve(
    role: ColumnRole,
    headers: &[String],
    override_name: Option<&str>,
    keywords: &[&str],
    taken: &[(ColumnRole, usize)],
) -> Result<usize, SchemaError> {
    if let Some(name) = override_name {
        let wanted = normalize_header(name);
        let index = headers
            .iter()
            .position(|h| *h == wanted)
            .ok_or_else(|| SchemaError::UnknownOverride { role, name: name.to_string() })?;

        if let Some(&(taken_by, _)) = taken.iter().find(|&&(_, i)| i == index) {
            return Err(SchemaError::ColumnTaken { role, name: name.to_string(), taken_by });
        }
        return Ok(index);
    }

    let candidates: Vec<usize> = (0..headers.len())
        .filter(|&i| taken.iter().all(|&(_, t)| t != i))
        .filter(|&i| keywords.iter().any(|k| headers[i].contains(k)))
        .collect();

    let chosen = keywords
        .iter()
        .find_map(|k| candidates.iter().copied().find(|&i| headers[i].contains(k)))
        .ok_or_else(|| SchemaError::MissingColumn { role, headers: headers.to_vec() })?;

    if candidates.len() > 1 {
        let others: Vec<&str> =
            candidates.iter().filter(|&&i| i != chosen).map(|&i| headers[i].as_str()).collect();
        warn!(
            "Ambiguous {} column: using '{}' over [{}]; set an explicit column override to change",
            role,
            headers[chosen],
            others.join(", ")
        );
    }

    Ok(chosen)
}
