//! CLI command implementations.

pub mod quote;
pub mod scan;
pub mod schema;
pub mod search;
pub mod shell;

pub use quote::{QuoteCommand, QuoteRequest};
pub use scan::ScanCommand;
pub use schema::SchemaCommand;
pub use search::SearchCommand;
pub use shell::ShellCommand;

use crate::catalog::{loader, Catalog};
use crate::config::Config;
use anyhow::{Context, Result};

/// Loads the configured catalog for a one-shot command.
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    let path = config.require_catalog()?;
    loader::load(path, &config.load_options())
        .with_context(|| format!("Catalog unavailable: {}", path.display()))
}
