//! Printable quote document.
//!
//! Fixed-width text, 100 columns, paginated with form feeds. Every page
//! carries the dealership header and ends with a `Page n of m` line; the
//! totals block, signature line and legal footer go on the last page.

use crate::format::truncate;
use crate::money::format_money;
use crate::quote::models::{Availability, LineItem, QuoteHeader, QuoteTotals};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Characters per printed line.
pub const PAGE_WIDTH: usize = 100;

/// Description cells are cut to this many characters.
pub const DESCRIPTION_WIDTH: usize = 27;

const SKU_WIDTH: usize = 14;
const FORM_FEED: char = '\u{0c}';

/// Business-facing text and page geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub dealership_name: String,
    pub legal_footer: Vec<String>,
    pub rows_per_page: usize,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            dealership_name: "PARTS DEPARTMENT".to_string(),
            legal_footer: vec![
                "Prices in MXN and include 16% VAT (IVA) where shown.".to_string(),
                "Quote valid for 15 days. Electrical parts are not returnable.".to_string(),
                "Warranty per manufacturer policy; installation by our service department required."
                    .to_string(),
            ],
            rows_per_page: 40,
        }
    }
}

/// Renders a quote as printable bytes (UTF-8 text).
///
/// Only re-displays values already on the line items and totals.
pub fn render_document(
    items: &[LineItem],
    totals: &QuoteTotals,
    header: &QuoteHeader,
    generated_at: DateTime<FixedOffset>,
    layout: &DocumentLayout,
) -> Vec<u8> {
    let per_page = layout.rows_per_page.max(1);
    let chunks: Vec<&[LineItem]> =
        if items.is_empty() { vec![items] } else { items.chunks(per_page).collect() };
    let page_count = chunks.len();

    let mut pages = Vec::with_capacity(page_count);
    for (i, chunk) in chunks.iter().enumerate() {
        let page_no = i + 1;
        let mut lines = Vec::new();

        lines.extend(page_header(layout, header, generated_at, page_no));
        lines.push(table_header());
        lines.push("-".repeat(PAGE_WIDTH));

        if chunk.is_empty() {
            lines.push("  (no items)".to_string());
        }
        for item in chunk.iter() {
            lines.push(table_row(item));
        }

        if page_no == page_count {
            lines.push("-".repeat(PAGE_WIDTH));
            lines.extend(totals_block(totals));
            lines.extend(legend(items));
            lines.extend(signature_block());
            lines.push(String::new());
            lines.extend(layout.legal_footer.iter().cloned());
        }

        lines.push(String::new());
        lines.push(right_align(&format!("Page {} of {}", page_no, page_count)));
        pages.push(lines.join("\n"));
    }

    let mut out = pages.join(&format!("\n{}", FORM_FEED));
    out.push('\n');
    out.into_bytes()
}

fn page_header(
    layout: &DocumentLayout,
    header: &QuoteHeader,
    generated_at: DateTime<FixedOffset>,
    page_no: usize,
) -> Vec<String> {
    let mut lines = vec!["=".repeat(PAGE_WIDTH), center(&layout.dealership_name)];

    let title = if page_no == 1 { "PARTS QUOTE" } else { "PARTS QUOTE (continued)" };
    let stamp = format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M %:z"));
    lines.push(two_columns(title, &stamp));
    lines.push("=".repeat(PAGE_WIDTH));

    if page_no == 1 {
        lines.push(two_columns(
            &format!("Date:     {}", generated_at.format("%Y-%m-%d")),
            &format!("Order:   {}", or_dash(&header.order_number)),
        ));
        lines.push(two_columns(
            &format!("Customer: {}", or_dash(&header.customer)),
            &format!("Vehicle: {}", or_dash(&header.vehicle_id)),
        ));
    } else {
        lines.push(format!("Order: {}", or_dash(&header.order_number)));
    }
    lines.push(String::new());
    lines
}

fn table_header() -> String {
    format!(
        "  {:<sku$} {:<desc$} {:>4} {:>12} {:>11} {:>12}  {}",
        "SKU",
        "DESCRIPTION",
        "QTY",
        "BASE PRICE",
        "TAX",
        "LINE TOTAL",
        "STATUS",
        sku = SKU_WIDTH,
        desc = DESCRIPTION_WIDTH
    )
}

fn table_row(item: &LineItem) -> String {
    format!(
        "{} {:<sku$} {:<desc$} {:>4} {:>12} {:>11} {:>12}  {}",
        item.status.marker(),
        truncate(&item.sku, SKU_WIDTH),
        truncate(&item.description, DESCRIPTION_WIDTH),
        item.quantity,
        format_money(item.base_price),
        format_money(item.tax_amount),
        format_money(item.total_amount),
        item.status.label(),
        sku = SKU_WIDTH,
        desc = DESCRIPTION_WIDTH
    )
}

fn totals_block(totals: &QuoteTotals) -> Vec<String> {
    [
        ("Subtotal:", totals.subtotal),
        ("Tax:", totals.total_tax),
        ("TOTAL:", totals.grand_total),
    ]
    .iter()
    .map(|(label, amount)| right_align(&format!("{:<10}{:>14}", label, format_money(*amount))))
    .collect()
}

fn legend(items: &[LineItem]) -> Vec<String> {
    let mut lines = Vec::new();
    if items.iter().any(|i| i.status == Availability::BackOrder) {
        lines.push("* BACK ORDER: part not in stock; ships when supplier stock arrives.".to_string());
    }
    if items.iter().any(|i| i.status == Availability::Unavailable) {
        lines.push("! UNAVAILABLE: part cannot currently be supplied.".to_string());
    }
    if !lines.is_empty() {
        lines.insert(0, String::new());
    }
    lines
}

fn signature_block() -> Vec<String> {
    vec![
        String::new(),
        String::new(),
        format!("{:<40}{:>60}", "_".repeat(36), "_".repeat(36)),
        format!("{:<40}{:>60}", "Customer signature", format!("{:<36}", "Parts advisor")),
    ]
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= PAGE_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((PAGE_WIDTH - len) / 2), text)
}

fn right_align(text: &str) -> String {
    format!("{:>width$}", text, width = PAGE_WIDTH)
}

fn two_columns(left: &str, right: &str) -> String {
    let half = PAGE_WIDTH / 2;
    format!("{:<half$}{}", left, right, half = half)
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRow;
    use crate::quote::models::compute_totals;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn timestamp() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(6 * 3600).unwrap().with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
    }

    fn item(sku: &str, description: &str, price: &str, qty: u32, status: Availability) -> LineItem {
        LineItem::from_row(&CatalogRow::new(sku, description, dec(price)), qty, dec("0.16"), status)
            .unwrap()
    }

    fn header() -> QuoteHeader {
        QuoteHeader {
            customer: "Juan Pérez".to_string(),
            vehicle_id: "3VWFE21C04M000001".to_string(),
            order_number: "OT-1024".to_string(),
        }
    }

    fn render(items: &[LineItem], layout: &DocumentLayout) -> String {
        let bytes = render_document(items, &compute_totals(items), &header(), timestamp(), layout);
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_document_contains_header_and_metadata() {
        let items = vec![item("90915-YZZD1", "OIL FILTER", "150.00", 3, Availability::Available)];
        let doc = render(&items, &DocumentLayout::default());

        assert!(doc.contains("PARTS DEPARTMENT"));
        assert!(doc.contains("Generated: 2026-10-19 14:30 -06:00"));
        assert!(doc.contains("Date:     2026-10-19"));
        assert!(doc.contains("Order:   OT-1024"));
        assert!(doc.contains("Customer: Juan Pérez"));
        assert!(doc.contains("Vehicle: 3VWFE21C04M000001"));
        assert!(doc.contains("Customer signature"));
        assert!(doc.contains("IVA"));
        assert!(doc.contains("Page 1 of 1"));
        assert_eq!(doc.matches("Generated:").count(), 1);
    }

    #[test]
    fn test_document_row_and_totals() {
        let items = vec![item("90915-YZZD1", "OIL FILTER", "150.00", 3, Availability::Available)];
        let doc = render(&items, &DocumentLayout::default());

        let row = doc.lines().find(|l| l.contains("90915-YZZD1")).unwrap();
        assert!(row.contains("OIL FILTER"));
        assert!(row.contains("$150.00"));
        assert!(row.contains("$72.00"));
        assert!(row.contains("$522.00"));
        assert!(row.contains("AVAILABLE"));
        assert!(row.starts_with(' '));

        assert!(doc.contains("Subtotal:") && doc.contains("$450.00"));
        assert!(doc.contains("TOTAL:"));
    }

    #[test]
    fn test_document_truncates_description() {
        let long = "PASTILLAS DE FRENO DELANTERAS CERAMICAS ALTO DESEMPEÑO";
        let items = vec![item("A1", long, "10", 1, Availability::Available)];
        let doc = render(&items, &DocumentLayout::default());

        assert!(!doc.contains(long));
        assert!(doc.contains("PASTILLAS DE FRENO DELAN..."));
        assert_eq!(truncate(long, DESCRIPTION_WIDTH).chars().count(), DESCRIPTION_WIDTH);
    }

    #[test]
    fn test_document_flags_status() {
        let items = vec![
            item("A1", "BALATA", "10", 1, Availability::Available),
            item("B2", "FILTRO", "10", 1, Availability::BackOrder),
            item("C3", "BUJIA", "10", 1, Availability::Unavailable),
        ];
        let doc = render(&items, &DocumentLayout::default());

        let row_of = |sku: &str| doc.lines().find(|l| l.contains(sku)).unwrap().to_string();
        assert!(row_of("A1").starts_with(' '));
        assert!(row_of("B2").starts_with('*'));
        assert!(row_of("B2").contains("BACK ORDER"));
        assert!(row_of("C3").starts_with('!'));
        assert!(row_of("C3").contains("UNAVAILABLE"));
        assert!(doc.contains("* BACK ORDER:"));
        assert!(doc.contains("! UNAVAILABLE:"));
    }

    #[test]
    fn test_document_no_legend_when_all_available() {
        let items = vec![item("A1", "BALATA", "10", 1, Availability::Available)];
        let doc = render(&items, &DocumentLayout::default());
        assert!(!doc.contains("* BACK ORDER:"));
        assert!(!doc.contains("! UNAVAILABLE:"));
    }

    #[test]
    fn test_document_paginates() {
        let items: Vec<LineItem> = (0..5)
            .map(|i| item(&format!("P{}", i), "PART", "1", 1, Availability::Available))
            .collect();
        let layout = DocumentLayout { rows_per_page: 2, ..Default::default() };
        let doc = render(&items, &layout);

        assert_eq!(doc.matches(FORM_FEED).count(), 2);
        assert!(doc.contains("Page 1 of 3"));
        assert!(doc.contains("Page 3 of 3"));
        assert_eq!(doc.matches("PARTS QUOTE (continued)").count(), 2);
        assert_eq!(doc.matches("Customer signature").count(), 1);

        let last_page = doc.split(FORM_FEED).last().unwrap();
        assert!(last_page.contains("P4"));
        assert!(last_page.contains("TOTAL:"));
    }

    #[test]
    fn test_document_empty_quote() {
        let doc = render(&[], &DocumentLayout::default());
        assert!(doc.contains("(no items)"));
        assert!(doc.contains("$0.00"));
        assert!(doc.contains("Page 1 of 1"));
    }

    #[test]
    fn test_document_lines_fit_page_width() {
        let items = vec![item(
            "90915-YZZD1-XL-EXTRA",
            "OIL FILTER",
            "12345.67",
            10,
            Availability::Unavailable,
        )];
        let doc = render(&items, &DocumentLayout::default());

        for line in doc.lines() {
            assert!(line.chars().count() <= PAGE_WIDTH, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn test_document_blank_metadata() {
        let bytes = render_document(
            &[],
            &QuoteTotals::default(),
            &QuoteHeader::default(),
            timestamp(),
            &DocumentLayout::default(),
        );
        let doc = String::from_utf8(bytes).unwrap();
        assert!(doc.contains("Customer: -"));
    }
}
