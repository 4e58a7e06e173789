//! Refinements applied to search matches before the display cap.
//!
//! Search itself only does substring matching; a counter clerk narrows the
//! result with a price window, by hiding parts the supplier left unpriced,
//! or by description words. Each refinement is a [`Filter`] and a
//! [`FilterChain`] keeps a row only when every refinement accepts it.

pub mod keyword;
pub mod price;
pub mod priced;

use crate::catalog::CatalogRow;
use crate::config::Config;
use rust_decimal::Decimal;
use tracing::debug;

pub use keyword::KeywordFilter;
pub use price::PriceFilter;
pub use priced::PricedFilter;

/// A single refinement over catalog rows.
pub trait Filter: Send + Sync {
    /// Returns true if the row stays in the result.
    fn matches(&self, row: &CatalogRow) -> bool;

    /// Short label for logs, e.g. `Price: $100.00 - $2,000.00`.
    fn description(&self) -> String;
}

/// Refinements that must all accept a row.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates a chain that keeps every row.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// The refinements configured for searches: price window, priced
    /// parts only, required and excluded description words.
    pub fn from_config(config: &Config) -> Self {
        FilterChainBuilder::new()
            .price_range(config.min_price, config.max_price)
            .priced_only(config.priced_only)
            .keywords(config.keywords.clone())
            .exclude_keywords(config.exclude_keywords.clone())
            .build()
    }

    /// Appends a refinement.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn matches(&self, row: &CatalogRow) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Drops rejected matches. Catalog order is preserved.
    pub fn apply<'a>(&self, rows: Vec<&'a CatalogRow>) -> Vec<&'a CatalogRow> {
        if self.filters.is_empty() {
            return rows;
        }

        let before = rows.len();
        let kept: Vec<&CatalogRow> = rows.into_iter().filter(|r| self.matches(r)).collect();
        debug!(
            "Refinements [{}] hid {} of {} matches",
            self.descriptions().join(", "),
            before - kept.len(),
            before
        );
        kept
    }

    /// Returns true if no refinement is configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a [`FilterChain`], skipping refinements left unset.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Base-price window; either bound may be open.
    pub fn price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        if min.is_some() || max.is_some() {
            self.chain.add(PriceFilter::new(min, max));
        }
        self
    }

    /// Hides parts the price file left without a usable price.
    pub fn priced_only(mut self, enabled: bool) -> Self {
        if enabled {
            self.chain.add(PricedFilter::new());
        }
        self
    }

    /// Description must mention every word.
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.chain.add(KeywordFilter::required(keywords));
        }
        self
    }

    /// Description must mention none of the words.
    pub fn exclude_keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.chain.add(KeywordFilter::excluded(keywords));
        }
        self
    }

    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
