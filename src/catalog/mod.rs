//! Price catalog: loading, schema inference, and load-once caching.

pub mod loader;
pub mod models;
pub mod schema;
pub mod sku;
pub mod store;

pub use loader::{LoadOptions, TextEncoding};
pub use models::{Catalog, CatalogRow};
pub use schema::{ColumnMap, ColumnOverrides};
pub use sku::{clean_sku, parse_price};
pub use store::CatalogStore;
