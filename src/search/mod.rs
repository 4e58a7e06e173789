//! Catalog queries: free-text substring search and exact scanner lookup.

use crate::catalog::{clean_sku, Catalog, CatalogRow};
use serde::Serialize;
use tracing::debug;

/// Default number of rows shown for a search.
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Returns every row where any column contains `query`, ignoring case and
/// surrounding whitespace. Rows keep catalog order. A blank query matches
/// nothing.
pub fn search_all<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a CatalogRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let matches: Vec<&CatalogRow> =
        catalog.rows().iter().filter(|row| row.contains_text(&needle)).collect();

    debug!("Search '{}' matched {} rows", needle, matches.len());
    matches
}

/// Finds the single row whose clean SKU equals the normalized `code`.
///
/// Absence is an ordinary outcome, not an error.
pub fn lookup_exact<'a>(catalog: &'a Catalog, code: &str) -> Option<&'a CatalogRow> {
    let key = clean_sku(code);
    if key.is_empty() {
        return None;
    }
    catalog.get(&key)
}

/// A display-capped slice of search matches.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPage<'a> {
    /// Rows to show
    pub rows: Vec<&'a CatalogRow>,
    /// Total rows that matched
    pub total: usize,
}

impl<'a> ResultPage<'a> {
    /// Keeps the first `limit` matches.
    pub fn capped(mut matches: Vec<&'a CatalogRow>, limit: usize) -> Self {
        let total = matches.len();
        matches.truncate(limit);
        Self { rows: matches, total }
    }

    /// Returns true when more rows matched than are shown.
    pub fn has_more(&self) -> bool {
        self.total > self.rows.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
