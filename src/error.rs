//! Typed failures for catalog loading, schema inference and quoting.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Column roles the loader has to identify in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Sku,
    Description,
    Price,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Sku => write!(f, "part number"),
            ColumnRole::Description => write!(f, "description"),
            ColumnRole::Price => write!(f, "price"),
        }
    }
}

/// The header row could not be mapped onto the columns the catalog needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no {role} column found among headers [{}]", headers.join(", "))]
    MissingColumn { role: ColumnRole, headers: Vec<String> },

    #[error("configured {role} column '{name}' is not in the header row")]
    UnknownOverride { role: ColumnRole, name: String },

    #[error("configured {role} column '{name}' is already the {taken_by} column")]
    ColumnTaken { role: ColumnRole, name: String, taken_by: ColumnRole },
}

/// Catalog could not be made available.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("zip archive contains no catalog file")]
    EmptyArchive,

    #[error("catalog is not valid {encoding} text: {detail}")]
    Decode { encoding: &'static str, detail: String },

    #[error("malformed catalog table: {0}")]
    Table(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A quote operation was rejected. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("part '{sku}' not found in catalog")]
    NotFound { sku: String },

    #[error("invalid quantity {quantity} for part '{sku}' (must be at least 1)")]
    InvalidQuantity { sku: String, quantity: u32 },

    #[error("amount for {quantity} x part '{sku}' is too large to quote")]
    AmountOverflow { sku: String, quantity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_headers() {
        let err = SchemaError::MissingColumn {
            role: ColumnRole::Price,
            headers: vec!["NUM PARTE".to_string(), "DESCRIPCION".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no price column found among headers [NUM PARTE, DESCRIPCION]"
        );
    }

    #[test]
    fn test_catalog_error_wraps_schema() {
        let err: CatalogError = SchemaError::UnknownOverride {
            role: ColumnRole::Sku,
            name: "CLAVE".to_string(),
        }
        .into();
        assert!(err.to_string().contains("configured part number column 'CLAVE'"));

        let err = SchemaError::ColumnTaken {
            role: ColumnRole::Price,
            name: "NUM PARTE".to_string(),
            taken_by: ColumnRole::Sku,
        };
        assert_eq!(
            err.to_string(),
            "configured price column 'NUM PARTE' is already the part number column"
        );
    }

    #[test]
    fn test_quote_error_messages() {
        let err = QuoteError::NotFound { sku: "NOPE".to_string() };
        assert_eq!(err.to_string(), "part 'NOPE' not found in catalog");

        let err = QuoteError::InvalidQuantity { sku: "A1".to_string(), quantity: 0 };
        assert!(err.to_string().contains("at least 1"));

        let err = QuoteError::AmountOverflow { sku: "A1".to_string(), quantity: 9 };
        assert_eq!(err.to_string(), "amount for 9 x part 'A1' is too large to quote");
    }
}
