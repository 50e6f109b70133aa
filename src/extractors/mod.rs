//! Field and quality extraction around the core parsers.
//!
//! Provides header field extraction (raga, tala, composer, deity, temple) and
//! the text-layer quality check that decides when OCR is needed.

pub mod fields;
pub mod quality;

pub use fields::{FieldExtractor, HeaderFieldExtractor, HeaderFields};
pub use quality::{needs_ocr, OcrReason, TextQuality};
