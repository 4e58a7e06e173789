//! Price-file ingestion: plain or zipped CSV into a [`Catalog`].

use crate::catalog::models::{Catalog, CatalogRow};
use crate::catalog::schema::{ColumnMap, ColumnOverrides};
use crate::catalog::sku::{clean_sku, parse_price};
use crate::error::CatalogError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, trace};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Text encoding of the price file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Strict ISO-8859-1: every byte is the code point of the same value,
    /// so 0x80-0x9F become C1 control characters
    Latin1,
    /// Windows code page 1252, what spreadsheet exports labelled "Latin-1"
    /// usually are. Differs from ISO-8859-1 only in 0x80-0x9F.
    Windows1252,
}

impl TextEncoding {
    fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
            TextEncoding::Windows1252 => "Windows-1252",
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "utf8" => Ok(TextEncoding::Utf8),
            "latin1" | "iso88591" => Ok(TextEncoding::Latin1),
            "windows1252" | "cp1252" => Ok(TextEncoding::Windows1252),
            _ => Err(format!("Unknown encoding: {}. Use: utf8, latin1, windows1252", s)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf8"),
            TextEncoding::Latin1 => write!(f, "latin1"),
            TextEncoding::Windows1252 => write!(f, "windows1252"),
        }
    }
}

/// How to read a price file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub encoding: TextEncoding,
    pub delimiter: u8,
    pub columns: ColumnOverrides,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { encoding: TextEncoding::Utf8, delimiter: b',', columns: ColumnOverrides::default() }
    }
}

/// Loads a catalog from a CSV file, or from a zip archive holding one.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Catalog, CatalogError> {
    let text = read_text(path, options.encoding)?;
    let catalog = parse(&text, options)?;
    info!("Loaded {} parts from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Reads only the header row of a price file and resolves its columns.
pub fn inspect(path: &Path, options: &LoadOptions) -> Result<ColumnMap, CatalogError> {
    let text = read_text(path, options.encoding)?;
    let mut reader = reader_for(&text, options.delimiter);
    let raw_headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    Ok(ColumnMap::infer(&raw_headers, &options.columns)?)
}

/// Parses catalog text (header row first) into a catalog.
pub fn parse(text: &str, options: &LoadOptions) -> Result<Catalog, CatalogError> {
    let mut reader = reader_for(text, options.delimiter);
    let raw_headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let columns = ColumnMap::infer(&raw_headers, &options.columns)?;

    let mut rows = Vec::new();
    let mut blank = 0usize;
    let mut unpriced = 0usize;

    for record in reader.records() {
        let record = record?;
        let mut fields: Vec<String> = record.iter().map(String::from).collect();
        if fields.len() < columns.headers.len() {
            fields.resize(columns.headers.len(), String::new());
        }

        if fields.iter().all(|f| f.trim().is_empty()) {
            blank += 1;
            continue;
        }

        let sku = fields[columns.sku].trim().to_string();
        let description = fields[columns.description].trim().to_string();
        let price_text = &fields[columns.price];

        let base_price = match parse_price(price_text) {
            Some(price) => price,
            None => {
                trace!("No usable price for '{}': {:?}", sku, price_text);
                unpriced += 1;
                Decimal::ZERO
            }
        };

        rows.push(CatalogRow { clean_sku: clean_sku(&sku), sku, description, base_price, fields });
    }

    debug!("Parsed {} rows ({} blank skipped, {} without price)", rows.len(), blank, unpriced);

    Ok(Catalog::from_rows(columns.headers, rows))
}

fn reader_for(text: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes())
}

pub(crate) fn read_text(path: &Path, encoding: TextEncoding) -> Result<String, CatalogError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CatalogError::NotFound { path: path.to_path_buf() }
        } else {
            CatalogError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let bytes = if is_zip(path, &bytes) { extract_from_zip(path, bytes)? } else { bytes };

    decode(bytes, encoding)
}

fn is_zip(path: &Path, bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC)
        || path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Picks the first `.csv`/`.txt` entry, else the first file.
fn extract_from_zip(path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, CatalogError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut files = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() || entry.name().starts_with("__MACOSX/") {
            continue;
        }
        files.push((i, entry.name().to_lowercase()));
    }

    let (index, name) = files
        .iter()
        .find(|(_, name)| name.ends_with(".csv") || name.ends_with(".txt"))
        .or_else(|| files.first())
        .cloned()
        .ok_or(CatalogError::EmptyArchive)?;

    debug!("Reading '{}' from {}", name, path.display());

    let mut entry = archive.by_index(index)?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buf)
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    Ok(buf)
}

/// Code points for 0x80-0x9F; unassigned slots keep the C1 control.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9f => WINDOWS_1252_HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}

fn decode(bytes: Vec<u8>, encoding: TextEncoding) -> Result<String, CatalogError> {
    let text = match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|e| CatalogError::Decode {
            encoding: encoding.label(),
            detail: e.utf8_error().to_string(),
        })?,
        TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        TextEncoding::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
    };

    if text.starts_with('\u{feff}') {
        return Ok(text['\u{feff}'.len_utf8()..].to_string());
    }
    Ok(text)
}
