//! parts-quote - price lookup and quoting for a dealership parts counter
//!
//! Loads a supplier price file (CSV, optionally zipped), searches it by
//! part number or description, and builds tax-inclusive quotes that can be
//! printed as paginated documents.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod money;
pub mod quote;
pub mod search;
pub mod services;

pub use catalog::{Catalog, CatalogRow, CatalogStore, LoadOptions};
pub use config::Config;
pub use error::{CatalogError, QuoteError, SchemaError};
pub use quote::{Availability, LineItem, QuoteSession, QuoteTotals};
