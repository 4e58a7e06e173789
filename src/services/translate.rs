//! Description translation for customers who don't read the catalog language.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

const TRANSLATE_BASE: &str = "https://translate.googleapis.com";

/// Trait for text translation - enables mocking for tests.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` from `source` to `target` language codes.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Client for the public Google Translate endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    /// Creates a translator against the public endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(TRANSLATE_BASE.to_string())
    }

    /// Creates a translator with a custom base URL (for testing or a proxy).
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!(
            "{}/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.base_url,
            urlencoding::encode(source),
            urlencoding::encode(target),
            urlencoding::encode(text)
        );

        debug!("Translating {} chars {}->{}", text.len(), source, target);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send translation request")?;

        if !response.status().is_success() {
            bail!("Translation service returned status: {}", response.status());
        }

        let body = response.text().await.context("Failed to read translation response")?;
        parse_response(&body)
    }
}

/// Extracts the translated text from the nested-array response.
///
/// The first element is a list of `[translated, original, ...]` segments.
fn parse_response(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("Translation response is not JSON")?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .context("Unexpected translation response shape")?;

    let translated: String =
        segments.iter().filter_map(|seg| seg.get(0).and_then(|s| s.as_str())).collect();

    if translated.trim().is_empty() {
        bail!("Translation response had no text");
    }
    Ok(translated)
}

/// Translates `text`, falling back to the original on any failure.
pub async fn translate_or_original(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> String {
    if text.trim().is_empty() || source.eq_ignore_ascii_case(target) {
        return text.to_string();
    }

    match translator.translate(text, source, target).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translation failed, showing original text: {:#}", e);
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
            bail!("service unavailable")
        }
    }

    struct UppercaseTranslator;

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn test_parse_response_joins_segments() {
        let body = r#"[[["Filtro de aceite. ","Oil filter. ",null,null,10],["Motor","Engine",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "Filtro de aceite. Motor");
    }

    #[test]
    fn test_parse_response_errors() {
        assert!(parse_response("<html>blocked</html>").is_err());
        assert!(parse_response("{}").is_err());
        assert!(parse_response("[[]]").is_err());
    }

    #[tokio::test]
    async fn test_translate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "es"))
            .and(query_param("q", "OIL FILTER"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[[["FILTRO DE ACEITE","OIL FILTER",null,null,10]],null,"en"]"#),
            )
            .mount(&mock_server)
            .await;

        let translator = GoogleTranslator::with_base_url(mock_server.uri()).unwrap();
        let result = translator.translate("OIL FILTER", "en", "es").await.unwrap();
        assert_eq!(result, "FILTRO DE ACEITE");
    }

    #[tokio::test]
    async fn test_translate_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let translator = GoogleTranslator::with_base_url(mock_server.uri()).unwrap();
        let err = translator.translate("OIL FILTER", "en", "es").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_translate_or_original_falls_back_on_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let translator = GoogleTranslator::with_base_url(mock_server.uri()).unwrap();
        let text = translate_or_original(&translator, "SPARK PLUG", "en", "es").await;
        assert_eq!(text, "SPARK PLUG");
    }

    #[tokio::test]
    async fn test_translate_or_original_falls_back() {
        let text = translate_or_original(&FailingTranslator, "BRAKE PAD", "en", "es").await;
        assert_eq!(text, "BRAKE PAD");
    }

    #[tokio::test]
    async fn test_translate_or_original_skips_same_language() {
        let text = translate_or_original(&UppercaseTranslator, "balata", "es", "ES").await;
        assert_eq!(text, "balata");

        let text = translate_or_original(&UppercaseTranslator, "balata", "es", "en").await;
        assert_eq!(text, "BALATA");
    }

    #[tokio::test]
    async fn test_translate_or_original_blank() {
        let text = translate_or_original(&UppercaseTranslator, "  ", "en", "es").await;
        assert_eq!(text, "  ");
    }
}
