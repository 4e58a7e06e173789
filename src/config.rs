//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::catalog::{ColumnOverrides, LoadOptions, TextEncoding};
use crate::quote::DocumentLayout;
use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

const APP_DIR: &str = "parts-quote";
const LOCAL_CONFIG: &str = "parts-quote.toml";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Price file (CSV or zipped CSV)
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Sales tax as a fraction (0.16 = 16%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Maximum number of search rows to display
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Text encoding of the price file
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Field delimiter of the price file
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Header names that bypass column inference
    #[serde(default)]
    pub columns: ColumnOverrides,

    /// Printed at the top of every quote page
    #[serde(default = "default_dealership_name")]
    pub dealership_name: String,

    /// Legal lines printed on the last quote page
    #[serde(default)]
    pub legal_footer: Option<Vec<String>>,

    /// Local time zone used to timestamp documents
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Line items per printed page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,

    /// Translate search result descriptions
    #[serde(default)]
    pub translate: bool,

    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    #[serde(default = "default_target_lang")]
    pub target_lang: String,

    /// Translation endpoint override
    #[serde(default)]
    pub translate_url: Option<String>,

    /// Filter: minimum base price
    #[serde(default)]
    pub min_price: Option<Decimal>,

    /// Filter: maximum base price
    #[serde(default)]
    pub max_price: Option<Decimal>,

    /// Filter: hide parts without a usable price
    #[serde(default)]
    pub priced_only: bool,

    /// Filter: keywords that must appear in the description
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Filter: keywords that must NOT appear in the description
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(16, 2)
}

fn default_max_results() -> usize {
    crate::search::DEFAULT_DISPLAY_LIMIT
}

fn default_delimiter() -> char {
    ','
}

fn default_dealership_name() -> String {
    DocumentLayout::default().dealership_name
}

fn default_utc_offset_hours() -> i32 {
    -6
}

fn default_rows_per_page() -> usize {
    DocumentLayout::default().rows_per_page
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "es".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            tax_rate: default_tax_rate(),
            max_results: default_max_results(),
            format: OutputFormat::Table,
            encoding: TextEncoding::Utf8,
            delimiter: default_delimiter(),
            columns: ColumnOverrides::default(),
            dealership_name: default_dealership_name(),
            legal_footer: None,
            utc_offset_hours: default_utc_offset_hours(),
            rows_per_page: default_rows_per_page(),
            translate: false,
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            translate_url: None,
            min_price: None,
            max_price: None,
            priced_only: false,
            keywords: Vec::new(),
            exclude_keywords: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new(LOCAL_CONFIG);
        if local_config.exists() {
            debug!("Found {} in current directory", LOCAL_CONFIG);
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_DIR).join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var("PARTS_CATALOG") {
            if !path.trim().is_empty() {
                self.catalog_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(rate) = std::env::var("PARTS_TAX_RATE") {
            match parse_tax_rate(&rate) {
                Ok(r) => self.tax_rate = r,
                Err(e) => warn!("Ignoring PARTS_TAX_RATE: {}", e),
            }
        }

        if let Ok(format) = std::env::var("PARTS_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        self
    }

    /// Rejects settings that would produce nonsense quotes.
    pub fn validate(&self) -> Result<()> {
        if self.tax_rate.is_sign_negative() || self.tax_rate >= Decimal::ONE {
            bail!("Tax rate must be a fraction between 0 and 1, got {}", self.tax_rate);
        }
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        if self.rows_per_page == 0 {
            bail!("rows_per_page must be at least 1");
        }
        Ok(())
    }

    /// Returns the configured catalog path or an error naming the fix.
    pub fn require_catalog(&self) -> Result<&Path> {
        self.catalog_path
            .as_deref()
            .context("No catalog configured. Pass --catalog, set PARTS_CATALOG or catalog_path")
    }

    /// Options for reading the price file.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            encoding: self.encoding,
            // validate() guarantees ASCII; fall back to comma otherwise
            delimiter: u8::try_from(self.delimiter).unwrap_or(b','),
            columns: self.columns.clone(),
        }
    }

    /// Page text and geometry for printed quotes.
    pub fn layout(&self) -> DocumentLayout {
        let defaults = DocumentLayout::default();
        DocumentLayout {
            dealership_name: self.dealership_name.clone(),
            legal_footer: self.legal_footer.clone().unwrap_or(defaults.legal_footer),
            rows_per_page: self.rows_per_page,
        }
    }
}

/// Parses a tax rate given either as a fraction (`0.16`) or a percentage (`16%`).
pub fn parse_tax_rate(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    let (number, percent) = match text.strip_suffix('%') {
        Some(n) => (n.trim(), true),
        None => (text, false),
    };

    let value = Decimal::from_str(number).map_err(|_| format!("Invalid tax rate: {}", text))?;
    let value = if percent { value / Decimal::ONE_HUNDRED } else { value };

    if value.is_sign_negative() || value >= Decimal::ONE {
        return Err(format!("Tax rate out of range: {}", text));
    }
    Ok(value)
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
