//! Barcode input.
//!
//! USB and Bluetooth scanners at the parts counter act as keyboards: the
//! "image" reaching us is the scanner's captured payload, possibly carrying
//! an AIM symbology prefix (`]C1`, `]E0`...), GS1 separators or a trailing
//! carriage return.

use tracing::debug;

/// Turns a captured scan into a code, if one is present.
pub trait BarcodeDecoder: Send + Sync {
    /// Returns `None` when no code could be read. That is not an error.
    fn decode(&self, image: &[u8]) -> Option<String>;
}

/// Decoder for keyboard-wedge scanner payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScannerInputDecoder;

impl ScannerInputDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDecoder for ScannerInputDecoder {
    fn decode(&self, image: &[u8]) -> Option<String> {
        let Ok(text) = std::str::from_utf8(image) else {
            debug!("Scanner payload is not text ({} bytes)", image.len());
            return None;
        };

        let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        let text = strip_symbology_id(text);

        let code: String = text.chars().filter(|c| !c.is_control()).collect();
        let code = code.trim();
        if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        }
    }
}

/// Removes a leading `]Xn` AIM symbology identifier.
fn strip_symbology_id(text: &str) -> &str {
    let mut chars = text.char_indices();
    match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some((_, ']')), Some((_, kind)), Some((_, modifier)), rest)
            if kind.is_ascii_alphabetic() && modifier.is_ascii_alphanumeric() =>
        {
            rest.map_or("", |(i, _)| &text[i..])
        }
        _ => text,
    }
}
