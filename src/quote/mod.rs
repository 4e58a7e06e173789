//! Quote building: line items, session state, bulk import and the printed document.

pub mod document;
pub mod import;
pub mod models;
pub mod session;

pub use document::{render_document, DocumentLayout};
pub use import::ImportEntry;
pub use models::{compute_totals, Availability, LineItem, QuoteHeader, QuoteTotals};
pub use session::{BulkAddReport, QuoteSession};
