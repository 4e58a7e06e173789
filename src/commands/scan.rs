//! Scanner-mode lookup: exact part-number matches, one code at a time.

use crate::catalog::{Catalog, CatalogRow};
use crate::config::Config;
use crate::format::Formatter;
use crate::search::lookup_exact;
use crate::services::BarcodeDecoder;
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Outcome of one scanned payload.
#[derive(Debug, PartialEq)]
pub enum ScanOutcome<'a> {
    Found(&'a CatalogRow),
    NotFound(String),
    /// The payload held no usable code
    NoCode,
}

/// Executes exact lookups for scanned or typed codes.
pub struct ScanCommand<D: BarcodeDecoder> {
    config: Config,
    decoder: D,
}

impl<D: BarcodeDecoder> ScanCommand<D> {
    /// Creates a new scan command.
    pub fn new(config: Config, decoder: D) -> Self {
        Self { config, decoder }
    }

    /// Decodes one payload and looks it up.
    pub fn scan<'a>(&self, catalog: &'a Catalog, payload: &[u8]) -> ScanOutcome<'a> {
        let Some(code) = self.decoder.decode(payload) else {
            debug!("No code detected in {} byte payload", payload.len());
            return ScanOutcome::NoCode;
        };

        match lookup_exact(catalog, &code) {
            Some(row) => ScanOutcome::Found(row),
            None => ScanOutcome::NotFound(code),
        }
    }

    /// Looks up every code and returns formatted output.
    pub fn execute(&self, catalog: &Catalog, codes: &[String]) -> Result<String> {
        let mut found = Vec::new();
        let mut missing = Vec::new();

        for code in codes {
            match self.scan(catalog, code.as_bytes()) {
                ScanOutcome::Found(row) => found.push(row),
                ScanOutcome::NotFound(code) => missing.push(code),
                ScanOutcome::NoCode => {}
            }
        }

        info!("Scanned {} codes: {} found, {} not found", codes.len(), found.len(), missing.len());

        let formatter = Formatter::new(self.config.format, self.config.tax_rate);
        let mut output = match found.as_slice() {
            [] => String::new(),
            [row] if codes.len() == 1 => formatter.format_row(row),
            rows => formatter.format_rows(rows),
        };

        for code in &missing {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("{}: NOT FOUND", code));
        }

        if output.is_empty() {
            output.push_str("No code detected.");
        }
        Ok(output)
    }

    /// Reads one code per line until end of input, reporting each as it arrives.
    pub async fn run<R, W>(&self, catalog: &Catalog, input: R, out: &mut W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let formatter = Formatter::new(self.config.format, self.config.tax_rate);
        let mut lines = input.lines();
        let mut scanned = 0;

        while let Some(line) = lines.next_line().await.context("Failed to read scanner input")? {
            match self.scan(catalog, line.as_bytes()) {
                ScanOutcome::Found(row) => writeln!(out, "{}\n", formatter.format_row(row))?,
                ScanOutcome::NotFound(code) => writeln!(out, "{}: NOT FOUND\n", code)?,
                ScanOutcome::NoCode => continue,
            }
            out.flush()?;
            scanned += 1;
        }

        Ok(scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ScannerInputDecoder;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_catalog() -> Catalog {
        Catalog::from_rows(
            Vec::new(),
            vec![CatalogRow::new("90915-YZZD1", "OIL FILTER", Decimal::from_str("150.00").unwrap())],
        )
    }

    fn make_command() -> ScanCommand<ScannerInputDecoder> {
        ScanCommand::new(Config::default(), ScannerInputDecoder::new())
    }

    #[test]
    fn test_scan_normalizes_code() {
        let catalog = make_catalog();
        let cmd = make_command();

        match cmd.scan(&catalog, b"90915yzzd1") {
            ScanOutcome::Found(row) => assert_eq!(row.sku, "90915-YZZD1"),
            other => panic!("expected a match, got {:?}", other),
        }
        assert_eq!(cmd.scan(&catalog, b"]C1 90915 YZZD1\r"), ScanOutcome::Found(&catalog.rows()[0]));
    }

    #[test]
    fn test_scan_not_found_and_no_code() {
        let catalog = make_catalog();
        let cmd = make_command();

        assert_eq!(cmd.scan(&catalog, b"12345"), ScanOutcome::NotFound("12345".to_string()));
        assert_eq!(cmd.scan(&catalog, b"   "), ScanOutcome::NoCode);
    }

    #[test]
    fn test_execute_single() {
        let output = make_command().execute(&make_catalog(), &["90915-YZZD1".to_string()]).unwrap();
        assert!(output.contains("Description: OIL FILTER"));
        assert!(output.contains("$174.00"));
    }

    #[test]
    fn test_execute_mixed() {
        let codes = vec!["90915YZZD1".to_string(), "NOPE".to_string()];
        let output = make_command().execute(&make_catalog(), &codes).unwrap();
        assert!(output.contains("Total: 1 parts"));
        assert!(output.ends_with("NOPE: NOT FOUND"));
    }

    #[test]
    fn test_execute_nothing_usable() {
        let output = make_command().execute(&make_catalog(), &[" ".to_string()]).unwrap();
        assert_eq!(output, "No code detected.");
    }

    #[tokio::test]
    async fn test_run_reads_lines() {
        let catalog = make_catalog();
        let input: &[u8] = b"90915-yzzd1\n\nXYZ\n";
        let mut out = Vec::new();

        let scanned = make_command().run(&catalog, input, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(scanned, 2);
        assert!(text.contains("OIL FILTER"));
        assert!(text.contains("XYZ: NOT FOUND"));
    }
}
