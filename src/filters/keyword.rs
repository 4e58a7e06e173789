//! Keyword filtering on part descriptions.

use super::Filter;
use crate::catalog::CatalogRow;

/// Filters rows by keywords in the description.
pub struct KeywordFilter {
    /// Keywords that must appear in the description.
    required: Vec<String>,
    /// Keywords that must NOT appear in the description.
    excluded: Vec<String>,
}

impl KeywordFilter {
    /// Creates a new keyword filter.
    pub fn new(required: Vec<String>, excluded: Vec<String>) -> Self {
        Self {
            required: required.into_iter().map(|k| k.to_lowercase()).collect(),
            excluded: excluded.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Creates a filter with only required keywords.
    pub fn required(keywords: Vec<String>) -> Self {
        Self::new(keywords, Vec::new())
    }

    /// Creates a filter with only excluded keywords.
    pub fn excluded(keywords: Vec<String>) -> Self {
        Self::new(Vec::new(), keywords)
    }
}

impl Filter for KeywordFilter {
    fn matches(&self, row: &CatalogRow) -> bool {
        let description = row.description.to_lowercase();

        self.required.iter().all(|k| description.contains(k))
            && !self.excluded.iter().any(|k| description.contains(k))
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();

        if !self.required.is_empty() {
            parts.push(format!("Must contain: {}", self.required.join(", ")));
        }

        if !self.excluded.is_empty() {
            parts.push(format!("Must not contain: {}", self.excluded.join(", ")));
        }

        if parts.is_empty() {
            "Keywords: any".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn make_row(description: &str) -> CatalogRow {
        CatalogRow::new("TEST", description, Decimal::ONE)
    }

    #[test]
    fn test_required_keywords() {
        let filter = KeywordFilter::required(vec!["balata".to_string(), "delantera".to_string()]);

        assert!(filter.matches(&make_row("Balata delantera ceramica")));
        assert!(filter.matches(&make_row("BALATA DELANTERA")));
        assert!(!filter.matches(&make_row("Balata trasera")));
    }

    #[test]
    fn test_excluded_keywords() {
        let filter = KeywordFilter::excluded(vec!["kit".to_string(), "reman".to_string()]);

        assert!(filter.matches(&make_row("Bomba de agua")));
        assert!(!filter.matches(&make_row("KIT DE AFINACION")));
        assert!(!filter.matches(&make_row("Alternador REMAN")));
    }

    #[test]
    fn test_empty_keywords() {
        let filter = KeywordFilter::new(Vec::new(), Vec::new());
        assert!(filter.matches(&make_row("Anything at all")));
    }

    #[test]
    fn test_description_both() {
        let filter = KeywordFilter::new(vec!["Filtro".to_string()], vec!["AIRE".to_string()]);
        assert_eq!(filter.description(), "Must contain: filtro; Must not contain: aire");
    }

    #[test]
    fn test_description_empty() {
        let filter = KeywordFilter::new(Vec::new(), Vec::new());
        assert_eq!(filter.description(), "Keywords: any");
    }
}
