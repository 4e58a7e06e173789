//! End-to-end quoting: catalog fixture, bulk import, totals and document.

use chrono::{FixedOffset, TimeZone};
use parts_quote::catalog::{loader, Catalog, CatalogRow, LoadOptions};
use parts_quote::commands::{QuoteCommand, QuoteRequest};
use parts_quote::config::Config;
use parts_quote::quote::import::read_entries;
use parts_quote::quote::{
    compute_totals, render_document, Availability, DocumentLayout, QuoteHeader, QuoteSession,
};
use parts_quote::services::FixedClock;
use parts_quote::search::lookup_exact;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn load_fixture() -> Catalog {
    loader::load(&fixture("price_list.csv"), &LoadOptions::default()).unwrap()
}

fn clock() -> FixedClock {
    let offset = FixedOffset::west_opt(6 * 3600).unwrap();
    FixedClock(offset.with_ymd_and_hms(2024, 11, 2, 17, 5, 0).unwrap())
}

#[test]
fn test_scanner_lookup_then_add() {
    let catalog = Catalog::from_rows(
        Vec::new(),
        vec![CatalogRow::new("90915-YZZD1", "OIL FILTER", dec("150.00"))],
    );

    let row = lookup_exact(&catalog, "90915yzzd1").unwrap();
    assert_eq!(row.sku, "90915-YZZD1");

    let mut session = QuoteSession::new();
    let item = session.add_item(&catalog, "90915yzzd1", 3, dec("0.16"), None).unwrap();
    assert_eq!(item.tax_amount, dec("72.00"));
    assert_eq!(item.total_amount, dec("522.00"));
}

#[test]
fn test_bulk_import_partial_failure() {
    let catalog = load_fixture();
    let entries = read_entries(&fixture("order.csv"), Default::default()).unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1].quantity, 1);

    let mut session = QuoteSession::new();
    let report = session.add_many(&catalog, &entries, dec("0.16"));

    assert_eq!(report.added, 3);
    assert_eq!(report.unmatched, vec!["NOPE-000"]);
    assert_eq!(session.len(), 3);

    let totals = session.totals();
    assert_eq!(totals.subtotal, dec("3494.25"));
    assert_eq!(totals.total_tax, dec("559.08"));
    assert_eq!(totals.grand_total, dec("4053.33"));
    assert_eq!(compute_totals(session.items()), totals);
}

#[test]
fn test_document_for_mixed_statuses() {
    let catalog = load_fixture();
    let mut session = QuoteSession::new();
    session.add_item(&catalog, "04465-02220", 1, dec("0.16"), None).unwrap();
    session
        .add_item(&catalog, "04466-02100", 2, dec("0.16"), Some(Availability::BackOrder))
        .unwrap();
    session
        .add_item(&catalog, "00123-45678", 1, dec("0.16"), Some(Availability::Unavailable))
        .unwrap();

    let header = QuoteHeader {
        customer: "TALLER HERMANOS RUIZ".to_string(),
        vehicle_id: "JTDBR32E720012345".to_string(),
        order_number: "OT-5521".to_string(),
    };
    let bytes = render_document(
        session.items(),
        &session.totals(),
        &header,
        clock().0,
        &DocumentLayout::default(),
    );
    let doc = String::from_utf8(bytes).unwrap();

    assert!(doc.contains("TALLER HERMANOS RUIZ"));
    assert!(doc.contains("OT-5521"));
    assert!(doc.contains("2024-11-02 17:05"));
    assert!(doc.contains("BACK ORDER"));
    assert!(doc.contains("UNAVAILABLE"));
    assert!(doc.contains("Page 1 of 1"));
    assert!(!doc.contains('\u{0c}'));
}

#[test]
fn test_quote_command_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("cotizacion.txt");
    let config = Config {
        catalog_path: Some(fixture("price_list.csv")),
        rows_per_page: 2,
        ..Config::default()
    };

    let request = QuoteRequest {
        items: vec!["90919-01253:4:backorder".parse().unwrap()],
        import: Some(fixture("order.csv")),
        header: QuoteHeader { order_number: "OT-1".to_string(), ..QuoteHeader::default() },
        output: Some(output_path.clone()),
    };

    let catalog = parts_quote::commands::load_catalog(&config).unwrap();
    let summary = QuoteCommand::new(config).execute(&catalog, &request, &clock()).unwrap();

    assert!(summary.contains("Not found: NOPE-000"));
    assert!(summary.contains("$4,053.33"));

    let doc = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(doc.matches('\u{0c}').count(), 1);
    assert!(doc.contains("Page 2 of 2"));
    assert!(doc.contains("$4,053.33"));
}
