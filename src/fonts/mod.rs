//! Legacy font handling.
//!
//! Scholarly Sanskrit typesetting often uses byte-oriented Devanagari fonts
//! whose glyph codes carry no Unicode mapping. This module recognises those
//! fonts and decodes their text.

pub mod legacy_decoder;
pub mod legacy_glyphs;

pub use legacy_decoder::LegacyGlyphDecoder;
pub use legacy_glyphs::is_legacy_font;
