//! Output formatting for catalog rows and quotes (table, JSON, markdown, CSV).

use crate::catalog::CatalogRow;
use crate::config::OutputFormat;
use crate::money::format_money;
use crate::quote::{LineItem, QuoteTotals};
use rust_decimal::Decimal;
use serde::Serialize;

const SKU_WIDTH: usize = 16;
const MONEY_WIDTH: usize = 12;
const DESCRIPTION_WIDTH: usize = 50;

/// A catalog row as shown to the user, with the tax-inclusive price.
#[derive(Debug, Serialize)]
struct PartView<'a> {
    sku: &'a str,
    description: &'a str,
    price: Option<Decimal>,
    price_with_tax: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct QuoteView<'a> {
    items: &'a [LineItem],
    totals: &'a QuoteTotals,
}

/// Formats catalog rows and quotes for output.
pub struct Formatter {
    format: OutputFormat,
    tax_rate: Decimal,
}

impl Formatter {
    /// Creates a new formatter. `tax_rate` is used for tax-inclusive prices.
    pub fn new(format: OutputFormat, tax_rate: Decimal) -> Self {
        Self { format, tax_rate }
    }

    fn view<'a>(&self, row: &'a CatalogRow) -> PartView<'a> {
        let priced = row.has_price();
        PartView {
            sku: &row.sku,
            description: &row.description,
            price: priced.then_some(row.base_price),
            price_with_tax: priced.then(|| row.price_with_tax(self.tax_rate)),
        }
    }

    /// Formats a single part in detail.
    pub fn format_row(&self, row: &CatalogRow) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(row),
            OutputFormat::Table => self.table_single(row),
            OutputFormat::Markdown => self.markdown_single(row),
            OutputFormat::Csv => self.csv_rows(&[row]),
        }
    }

    /// Formats a list of parts.
    pub fn format_rows(&self, rows: &[&CatalogRow]) -> String {
        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::csv_rows_header().to_string(),
                _ => "No parts found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_rows(rows),
            OutputFormat::Table => self.table_rows(rows),
            OutputFormat::Markdown => self.markdown_rows(rows),
            OutputFormat::Csv => self.csv_rows(rows),
        }
    }

    /// Formats the line items and totals of a quote.
    pub fn format_quote(&self, items: &[LineItem], totals: &QuoteTotals) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&QuoteView { items, totals })
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => self.table_quote(items, totals),
            OutputFormat::Markdown => self.markdown_quote(items, totals),
            OutputFormat::Csv => self.csv_quote(items),
        }
    }

    /// Formats just the totals block.
    pub fn format_totals(&self, totals: &QuoteTotals) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(totals).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Csv => format!(
                "subtotal,tax,total\n{},{},{}",
                totals.subtotal, totals.total_tax, totals.grand_total
            ),
            _ => Self::totals_lines(totals).join("\n"),
        }
    }

    // JSON formatting

    fn json_single(&self, row: &CatalogRow) -> String {
        serde_json::to_string_pretty(&self.view(row)).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_rows(&self, rows: &[&CatalogRow]) -> String {
        let views: Vec<PartView<'_>> = rows.iter().map(|r| self.view(r)).collect();
        serde_json::to_string_pretty(&views).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_single(&self, row: &CatalogRow) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Part:        {}", row.sku));
        lines.push(format!("Description: {}", row.description));
        if row.has_price() {
            lines.push(format!("Price:       {}", format_money(row.base_price)));
            lines.push(format!(
                "With tax:    {}",
                format_money(row.price_with_tax(self.tax_rate))
            ));
        } else {
            lines.push("Price:       N/A".to_string());
        }

        lines.join("\n")
    }

    fn table_rows(&self, rows: &[&CatalogRow]) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{:<SKU_WIDTH$}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {}",
            "Part", "Price", "With tax", "Description"
        ));
        lines.push(format!(
            "{:-<SKU_WIDTH$}  {:-<MONEY_WIDTH$}  {:-<MONEY_WIDTH$}  {:-<DESCRIPTION_WIDTH$}",
            "", "", "", ""
        ));

        for row in rows {
            let (price, with_tax) = self.price_cells(row);
            lines.push(format!(
                "{:<SKU_WIDTH$}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {}",
                row.sku,
                price,
                with_tax,
                truncate(&row.description, DESCRIPTION_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} parts", rows.len()));

        lines.join("\n")
    }

    fn table_quote(&self, items: &[LineItem], totals: &QuoteTotals) -> String {
        let mut lines = Vec::new();

        if items.is_empty() {
            lines.push("Quote is empty.".to_string());
        } else {
            lines.push(format!(
                "{:>3}  {:<SKU_WIDTH$}  {:>4}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {:<11}  {}",
                "#", "Part", "Qty", "Unit", "Tax", "Total", "Status", "Description"
            ));
            for (i, item) in items.iter().enumerate() {
                lines.push(format!(
                    "{:>3}  {:<SKU_WIDTH$}  {:>4}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {:>MONEY_WIDTH$}  {:<11}  {}",
                    i + 1,
                    item.sku,
                    item.quantity,
                    format_money(item.base_price),
                    format_money(item.tax_amount),
                    format_money(item.total_amount),
                    item.status.label(),
                    truncate(&item.description, 30)
                ));
            }
        }

        lines.push(String::new());
        lines.extend(Self::totals_lines(totals));
        lines.join("\n")
    }

    fn totals_lines(totals: &QuoteTotals) -> Vec<String> {
        vec![
            format!("Subtotal: {:>MONEY_WIDTH$}", format_money(totals.subtotal)),
            format!("Tax:      {:>MONEY_WIDTH$}", format_money(totals.total_tax)),
            format!("Total:    {:>MONEY_WIDTH$}", format_money(totals.grand_total)),
        ]
    }

    fn price_cells(&self, row: &CatalogRow) -> (String, String) {
        if row.has_price() {
            (format_money(row.base_price), format_money(row.price_with_tax(self.tax_rate)))
        } else {
            ("N/A".to_string(), "N/A".to_string())
        }
    }

    // Markdown formatting

    fn markdown_single(&self, row: &CatalogRow) -> String {
        let (price, with_tax) = self.price_cells(row);
        [
            format!("## {}", row.sku),
            String::new(),
            format!("- **Description:** {}", row.description),
            format!("- **Price:** {}", price),
            format!("- **With tax:** {}", with_tax),
        ]
        .join("\n")
    }

    fn markdown_rows(&self, rows: &[&CatalogRow]) -> String {
        let mut lines = Vec::new();

        lines.push("| Part | Price | With tax | Description |".to_string());
        lines.push("|------|-------|----------|-------------|".to_string());

        for row in rows {
            let (price, with_tax) = self.price_cells(row);
            lines.push(format!(
                "| {} | {} | {} | {} |",
                row.sku,
                price,
                with_tax,
                row.description.replace('|', "\\|")
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} parts found*", rows.len()));

        lines.join("\n")
    }

    fn markdown_quote(&self, items: &[LineItem], totals: &QuoteTotals) -> String {
        let mut lines = Vec::new();

        lines.push("| Part | Description | Qty | Unit | Tax | Total | Status |".to_string());
        lines.push("|------|-------------|-----|------|-----|-------|--------|".to_string());
        for item in items {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {} |",
                item.sku,
                item.description.replace('|', "\\|"),
                item.quantity,
                format_money(item.base_price),
                format_money(item.tax_amount),
                format_money(item.total_amount),
                item.status.label()
            ));
        }

        lines.push(String::new());
        lines.push(format!("- **Subtotal:** {}", format_money(totals.subtotal)));
        lines.push(format!("- **Tax:** {}", format_money(totals.total_tax)));
        lines.push(format!("- **Total:** {}", format_money(totals.grand_total)));
        lines.join("\n")
    }

    // CSV formatting

    fn csv_rows_header() -> &'static str {
        "sku,description,price,price_with_tax"
    }

    fn csv_rows(&self, rows: &[&CatalogRow]) -> String {
        let mut lines = vec![Self::csv_rows_header().to_string()];

        for row in rows {
            let view = self.view(row);
            lines.push(format!(
                "{},{},{},{}",
                Self::csv_escape(view.sku),
                Self::csv_escape(view.description),
                view.price.map(|p| p.to_string()).unwrap_or_default(),
                view.price_with_tax.map(|p| p.to_string()).unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_quote(&self, items: &[LineItem]) -> String {
        let mut lines = vec!["sku,description,quantity,unit_price,tax,total,status".to_string()];

        for item in items {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(&item.sku),
                Self::csv_escape(&item.description),
                item.quantity,
                item.base_price,
                item.tax_amount,
                item.total_amount,
                item.status
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Cuts `text` to `width` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
