//! Composition structure recovery.
//!
//! Turns a segment's flat body text into labelled lyric sections, per-language
//! lyric variants and the positions where commentary begins.
//!
//! ## Overview
//!
//! - [`patterns`]: versioned header tables, language headers, boundary labels
//! - [`blocks`]: line tokenizer and the header-driven block builder
//! - [`parser`]: section extraction and variant assembly
//!
//! ## Example
//!
//! ```
//! use kriti_oxide::structure::StructureParser;
//!
//! let result = StructureParser::new().parse("Pallavi\nakhila\nCharanam\nsiva");
//! assert_eq!(result.sections[1].label, "Verse");
//! ```

pub mod blocks;
pub mod parser;
pub mod patterns;
mod types;

pub use parser::StructureParser;
pub use patterns::{HeaderTable, LanguageLabel, HEADER_TABLE_VERSION};
pub use types::{
    BoundaryLabel, DetectedSection, LyricVariant, MetadataBoundary, SectionKind,
    StructureParseResult, VariantSection,
};
