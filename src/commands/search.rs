//! Search command implementation.

use crate::catalog::{Catalog, CatalogRow};
use crate::config::{Config, OutputFormat};
use crate::filters::FilterChain;
use crate::format::Formatter;
use crate::search::{search_all, ResultPage};
use crate::services::{translate_or_original, GoogleTranslator, Translator};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Executes a free-text catalog search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Searches and returns formatted output, translating descriptions when configured.
    pub async fn execute(&self, catalog: &Catalog, query: &str) -> Result<String> {
        if !self.config.translate {
            return self.execute_with_translator(catalog, query, None).await;
        }

        let translator = build_translator(&self.config)?;
        self.execute_with_translator(catalog, query, Some(&translator)).await
    }

    /// Searches with a provided translator (for testing).
    pub async fn execute_with_translator(
        &self,
        catalog: &Catalog,
        query: &str,
        translator: Option<&dyn Translator>,
    ) -> Result<String> {
        info!("Searching for: {}", query);

        let filters = FilterChain::from_config(&self.config);

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let matches = filters.apply(search_all(catalog, query));
        let page = ResultPage::capped(matches, self.config.max_results);

        info!("Found {} parts matching criteria", page.total);

        let rows: Vec<CatalogRow> = match translator {
            Some(t) => translate_rows(&page.rows, t, &self.config).await,
            None => page.rows.iter().map(|r| (*r).clone()).collect(),
        };
        let refs: Vec<&CatalogRow> = rows.iter().collect();

        let formatter = Formatter::new(self.config.format, self.config.tax_rate);
        let mut output = formatter.format_rows(&refs);

        if page.has_more() {
            let notice = format!(
                "Showing {} of {} matches. Refine the search to see the rest.",
                page.rows.len(),
                page.total
            );
            match self.config.format {
                OutputFormat::Table | OutputFormat::Markdown => {
                    output.push_str("\n\n");
                    output.push_str(&notice);
                }
                // keep machine-readable output parseable
                OutputFormat::Json | OutputFormat::Csv => warn!("{}", notice),
            }
        }

        Ok(output)
    }
}

/// Builds the HTTP translator from configuration.
pub fn build_translator(config: &Config) -> Result<GoogleTranslator> {
    let translator = match &config.translate_url {
        Some(url) => GoogleTranslator::with_base_url(url.clone()),
        None => GoogleTranslator::new(),
    };
    translator.context("Failed to create translation client")
}

async fn translate_rows(
    rows: &[&CatalogRow],
    translator: &dyn Translator,
    config: &Config,
) -> Vec<CatalogRow> {
    let mut translated = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row = (*row).clone();
        row.description = translate_or_original(
            translator,
            &row.description,
            &config.source_lang,
            &config.target_lang,
        )
        .await;
        translated.push(row);
    }
    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock translator that prefixes text and counts calls.
    struct MockTranslator {
        calls: AtomicU32,
        fail: bool,
    }

    impl MockTranslator {
        fn new(fail: bool) -> Self {
            Self { calls: AtomicU32::new(0), fail }
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("quota exceeded");
            }
            Ok(format!("[{}] {}", target, text))
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_test_config() -> Config {
        Config { max_results: 5, ..Config::default() }
    }

    fn make_catalog() -> Catalog {
        Catalog::from_rows(
            Vec::new(),
            vec![
                CatalogRow::new("04465-02220", "BALATA DELANTERA", dec("850.00")),
                CatalogRow::new("04466-02100", "BALATA TRASERA", dec("640.00")),
                CatalogRow::new("90915-YZZD1", "FILTRO DE ACEITE", dec("150.00")),
                CatalogRow::new("90919-01253", "BUJIA IRIDIUM", dec("320.00")),
            ],
        )
    }

    #[tokio::test]
    async fn test_search_command_basic() {
        let cmd = SearchCommand::new(make_test_config());
        let output = cmd.execute_with_translator(&make_catalog(), "balata", None).await.unwrap();

        assert!(output.contains("04465-02220"));
        assert!(output.contains("04466-02100"));
        assert!(!output.contains("90915-YZZD1"));
        assert!(output.contains("$986.00"));
    }

    #[tokio::test]
    async fn test_search_command_empty_results() {
        let cmd = SearchCommand::new(make_test_config());
        let output = cmd.execute_with_translator(&make_catalog(), "radiador", None).await.unwrap();
        assert!(output.contains("No parts found"));
    }

    #[tokio::test]
    async fn test_search_command_with_filters() {
        let config = Config {
            min_price: Some(dec("200")),
            exclude_keywords: vec!["trasera".to_string()],
            ..make_test_config()
        };

        let cmd = SearchCommand::new(config);
        let output = cmd.execute_with_translator(&make_catalog(), "0", None).await.unwrap();

        assert!(output.contains("04465-02220"));
        assert!(output.contains("90919-01253"));
        assert!(!output.contains("04466-02100"));
        assert!(!output.contains("90915-YZZD1"));
    }

    #[tokio::test]
    async fn test_search_command_required_keywords_and_priced() {
        let catalog = Catalog::from_rows(
            Vec::new(),
            vec![
                CatalogRow::new("04465-02220", "BALATA DELANTERA", dec("850.00")),
                CatalogRow::new("04465-09999", "BALATA DELANTERA CERAMICA", Decimal::ZERO),
                CatalogRow::new("04466-02100", "BALATA TRASERA", dec("640.00")),
            ],
        );
        let config = Config {
            keywords: vec!["delantera".to_string()],
            priced_only: true,
            ..make_test_config()
        };

        let output = SearchCommand::new(config)
            .execute_with_translator(&catalog, "balata", None)
            .await
            .unwrap();

        assert!(output.contains("04465-02220"));
        assert!(!output.contains("04465-09999"));
        assert!(!output.contains("04466-02100"));
    }

    #[tokio::test]
    async fn test_search_command_max_results() {
        let config = Config { max_results: 2, ..make_test_config() };
        let cmd = SearchCommand::new(config);
        let output = cmd.execute_with_translator(&make_catalog(), "0", None).await.unwrap();

        assert!(output.contains("Total: 2 parts"));
        assert!(output.contains("Showing 2 of 4 matches"));
    }

    #[tokio::test]
    async fn test_search_command_json_stays_parseable() {
        let config = Config { max_results: 1, format: OutputFormat::Json, ..make_test_config() };
        let cmd = SearchCommand::new(config);
        let output = cmd.execute_with_translator(&make_catalog(), "balata", None).await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_command_translates_descriptions() {
        let translator = MockTranslator::new(false);
        let cmd = SearchCommand::new(make_test_config());
        let output = cmd
            .execute_with_translator(&make_catalog(), "bujia", Some(&translator))
            .await
            .unwrap();

        assert!(output.contains("[es] BUJIA IRIDIUM"));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_command_translation_failure_keeps_original() {
        let translator = MockTranslator::new(true);
        let cmd = SearchCommand::new(make_test_config());
        let output = cmd
            .execute_with_translator(&make_catalog(), "balata", Some(&translator))
            .await
            .unwrap();

        assert!(output.contains("BALATA DELANTERA"));
        assert!(!output.contains("[es]"));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
    }
}
