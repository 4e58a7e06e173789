//! Interactive counter session.
//!
//! One session owns one quote. The catalog is loaded through a
//! [`CatalogStore`]; if loading fails the shell stays up, reports
//! "catalog unavailable", and catalog-dependent commands do nothing until
//! a `reload` succeeds. No command error ends the session.

use crate::catalog::{Catalog, CatalogStore};
use crate::commands::quote::{report_lines, write_document};
use crate::commands::{ScanCommand, SearchCommand};
use crate::config::Config;
use crate::format::Formatter;
use crate::quote::import::read_entries;
use crate::quote::{render_document, ImportEntry, QuoteHeader, QuoteSession};
use crate::services::{Clock, ScannerInputDecoder, Translator};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

const PROMPT: &str = "parts> ";

const HELP: &str = "\
Commands:
  search <text>                 find parts by any column
  scan <code>                   exact part-number lookup
  add <sku> [qty] [status]      add a part to the quote (status: available, backorder, unavailable)
  import <file>                 add every part listed in a CSV file
  list                          show the quote
  totals                        show subtotal, tax and total
  clear                         empty the quote
  customer|vehicle|order <text> set document details
  export [file]                 write the printable quote
  reload                        re-read the price file
  help                          show this help
  quit                          leave the session";

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Print(String),
    Quit,
}

/// Interactive session over any line-oriented input.
pub struct ShellCommand {
    config: Config,
    store: CatalogStore,
    catalog: Option<Arc<Catalog>>,
    session: QuoteSession,
    header: QuoteHeader,
    translator: Option<Box<dyn Translator>>,
    clock: Box<dyn Clock>,
}

impl ShellCommand {
    /// Creates a session and attempts the initial catalog load.
    pub fn new(config: Config, clock: Box<dyn Clock>) -> Self {
        let store = CatalogStore::new(config.load_options());
        let mut shell = Self {
            config,
            store,
            catalog: None,
            session: QuoteSession::new(),
            header: QuoteHeader::default(),
            translator: None,
            clock,
        };
        if let Err(message) = shell.open_catalog() {
            warn!("{}", message);
        }
        shell
    }

    /// Translates search descriptions with `translator`.
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Returns true when a catalog is loaded.
    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// The quote built so far.
    pub fn session(&self) -> &QuoteSession {
        &self.session
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match &self.catalog {
            Some(catalog) => writeln!(out, "Catalog loaded: {} parts.", catalog.len())?,
            None => writeln!(out, "{}", self.unavailable())?,
        }
        writeln!(out, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            match self.handle(&line).await {
                Ok(Step::Print(text)) if text.is_empty() => {}
                Ok(Step::Print(text)) => writeln!(out, "{}", text)?,
                Ok(Step::Quit) => break,
                Err(e) => writeln!(out, "Error: {:#}", e)?,
            }
        }

        debug!("Session ended with {} line items", self.session.len());
        Ok(())
    }

    async fn handle(&mut self, line: &str) -> Result<Step> {
        let line = line.trim();
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((c, rest)) => (c, rest.trim()),
            None => (line, ""),
        };

        let text = match command.to_lowercase().as_str() {
            "" => String::new(),
            "quit" | "exit" | "q" => return Ok(Step::Quit),
            "help" | "?" => HELP.to_string(),
            "search" | "s" => self.search(args).await?,
            "scan" => self.scan(args)?,
            "add" | "a" => self.add(args),
            "import" => self.import(args)?,
            "list" | "ls" => {
                self.formatter().format_quote(self.session.items(), &self.session.totals())
            }
            "totals" => self.formatter().format_totals(&self.session.totals()),
            "clear" => {
                self.session.clear();
                "Quote cleared.".to_string()
            }
            "customer" => set_field(&mut self.header.customer, "Customer", args),
            "vehicle" => set_field(&mut self.header.vehicle_id, "Vehicle", args),
            "order" => set_field(&mut self.header.order_number, "Order", args),
            "export" => self.export(args)?,
            "reload" => self.reload(),
            other => format!("Unknown command '{}'. Type 'help' for commands.", other),
        };

        Ok(Step::Print(text))
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.format, self.config.tax_rate)
    }

    fn unavailable(&self) -> String {
        "Catalog unavailable. Fix the price file and type 'reload'.".to_string()
    }

    async fn search(&self, query: &str) -> Result<String> {
        let Some(catalog) = &self.catalog else {
            return Ok(self.unavailable());
        };
        if query.is_empty() {
            return Ok("Usage: search <text>".to_string());
        }

        SearchCommand::new(self.config.clone())
            .execute_with_translator(catalog, query, self.translator.as_deref())
            .await
    }

    fn scan(&self, code: &str) -> Result<String> {
        let Some(catalog) = &self.catalog else {
            return Ok(self.unavailable());
        };

        ScanCommand::new(self.config.clone(), ScannerInputDecoder::new())
            .execute(catalog, &[code.to_string()])
    }

    fn add(&mut self, args: &str) -> String {
        let Some(catalog) = &self.catalog else {
            return self.unavailable();
        };

        // "add SKU 2 backorder" and "add SKU:2:backorder" are equivalent
        let spec = args.split_whitespace().collect::<Vec<_>>().join(":");
        let entry: ImportEntry = match spec.parse() {
            Ok(entry) => entry,
            Err(e) => return format!("{}. Usage: add <sku> [qty] [status]", e),
        };

        match self.session.add_item(
            catalog,
            &entry.sku,
            entry.quantity,
            self.config.tax_rate,
            entry.status,
        ) {
            Ok(item) => format!(
                "Added {} x{} {} ({})",
                item.sku,
                item.quantity,
                item.description,
                item.status.label()
            ),
            Err(e) => e.to_string(),
        }
    }

    fn import(&mut self, path: &str) -> Result<String> {
        let Some(catalog) = &self.catalog else {
            return Ok(self.unavailable());
        };
        if path.is_empty() {
            return Ok("Usage: import <file>".to_string());
        }

        let entries = read_entries(&PathBuf::from(path), self.config.encoding)?;
        let report = self.session.add_many(catalog, &entries, self.config.tax_rate);
        Ok(format!(
            "Imported {} of {} entries.{}",
            report.added,
            entries.len(),
            report_lines(&report)
        ))
    }

    fn export(&self, path: &str) -> Result<String> {
        if self.session.is_empty() {
            return Ok("Quote is empty; nothing to export.".to_string());
        }

        let now = self.clock.now();
        let path = if path.is_empty() {
            PathBuf::from(format!("quote-{}.txt", now.format("%Y%m%d-%H%M%S")))
        } else {
            PathBuf::from(path)
        };

        let document = render_document(
            self.session.items(),
            &self.session.totals(),
            &self.header,
            now,
            &self.config.layout(),
        );
        write_document(&path, &document)?;
        Ok(format!("Quote written to {}", path.display()))
    }

    fn reload(&mut self) -> String {
        self.open_catalog_with(true).unwrap_or_else(|message| message)
    }

    /// Loads the configured catalog, leaving it unset on failure.
    fn open_catalog(&mut self) -> Result<String, String> {
        self.open_catalog_with(false)
    }

    /// `refresh` re-reads the file when it changed since it was cached.
    fn open_catalog_with(&mut self, refresh: bool) -> Result<String, String> {
        self.catalog = None;
        let Some(path) = self.config.catalog_path.clone() else {
            return Err(format!("{} (no catalog configured)", self.unavailable()));
        };

        let loaded = if refresh { self.store.refresh(&path) } else { self.store.get(&path) };
        match loaded {
            Ok(catalog) => {
                let message = format!("Catalog loaded: {} parts.", catalog.len());
                self.catalog = Some(catalog);
                Ok(message)
            }
            Err(e) => Err(format!("{} ({})", self.unavailable(), e)),
        }
    }
}

fn set_field(field: &mut String, label: &str, value: &str) -> String {
    *field = value.to_string();
    if value.is_empty() {
        format!("{} cleared.", label)
    } else {
        format!("{}: {}", label, value)
    }
}
