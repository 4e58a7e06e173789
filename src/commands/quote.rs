//! One-shot quote: build from item specs and/or an import file, then print.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::format::Formatter;
use crate::quote::import::read_entries;
use crate::quote::{render_document, BulkAddReport, ImportEntry, QuoteHeader, QuoteSession};
use crate::services::Clock;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// What to put on the quote and where to write it.
#[derive(Debug, Clone, Default)]
pub struct QuoteRequest {
    pub items: Vec<ImportEntry>,
    pub import: Option<PathBuf>,
    pub header: QuoteHeader,
    /// Document path; defaults to a timestamped file in the current directory
    pub output: Option<PathBuf>,
}

/// Builds a quote and writes its printable document.
pub struct QuoteCommand {
    config: Config,
}

impl QuoteCommand {
    /// Creates a new quote command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the quote, writes the document and returns the summary.
    pub fn execute(
        &self,
        catalog: &Catalog,
        request: &QuoteRequest,
        clock: &dyn Clock,
    ) -> Result<String> {
        let mut session = QuoteSession::new();
        let report = self.fill(&mut session, catalog, request)?;

        let now = clock.now();
        let path = request
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("quote-{}.txt", now.format("%Y%m%d-%H%M%S"))));

        let totals = session.totals();
        let document =
            render_document(session.items(), &totals, &request.header, now, &self.config.layout());
        write_document(&path, &document)?;

        info!("Wrote {} line items to {}", session.len(), path.display());

        let formatter = Formatter::new(self.config.format, self.config.tax_rate);
        let mut output = formatter.format_quote(session.items(), &totals);
        output.push_str(&report_lines(&report));
        output.push_str(&format!("\nQuote written to {}", path.display()));
        Ok(output)
    }

    /// Adds the explicit items first, then the import file's entries.
    fn fill(
        &self,
        session: &mut QuoteSession,
        catalog: &Catalog,
        request: &QuoteRequest,
    ) -> Result<BulkAddReport> {
        let mut report = session.add_many(catalog, &request.items, self.config.tax_rate);

        if let Some(path) = &request.import {
            let entries = read_entries(path, self.config.encoding)?;
            let imported = session.add_many(catalog, &entries, self.config.tax_rate);
            report.added += imported.added;
            report.unmatched.extend(imported.unmatched);
            report.rejected.extend(imported.rejected);
        }

        Ok(report)
    }
}

/// Writes rendered document bytes, creating parent directories.
pub fn write_document(path: &Path, document: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, document)
        .with_context(|| format!("Failed to write quote document: {}", path.display()))
}

/// Human-readable lines for unmatched and rejected entries.
pub fn report_lines(report: &BulkAddReport) -> String {
    let mut lines = String::new();
    if !report.unmatched.is_empty() {
        lines.push_str(&format!("\nNot found: {}", report.unmatched.join(", ")));
    }
    if !report.rejected.is_empty() {
        lines.push_str(&format!("\nRejected (invalid quantity): {}", report.rejected.join(", ")));
    }
    lines
}
