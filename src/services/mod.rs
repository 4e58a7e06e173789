//! External collaborators: translation, barcode input and the clock.
//!
//! All of these are fallible or environment-dependent; callers get a
//! fallback value instead of an error wherever the core must keep going.

pub mod barcode;
pub mod clock;
pub mod translate;

pub use barcode::{BarcodeDecoder, ScannerInputDecoder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use translate::{translate_or_original, GoogleTranslator, Translator};
