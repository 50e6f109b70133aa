//! Types produced by the structure parser.
//!
//! Offsets are character (Unicode scalar) offsets into the text handed to
//! [`StructureParser::parse`](super::StructureParser::parse).

use crate::text::Script;
use serde::{Deserialize, Serialize};

/// Structural role of a lyric section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionKind {
    /// Opening refrain (pallavi)
    Refrain,
    /// Second refrain (anupallavi)
    SubRefrain,
    /// Verse (charanam)
    Verse,
    /// Combined verse replacing anupallavi + charanam (samashti charanam)
    CompositeVerse,
    /// Solfa passage (chittaswaram)
    OrnamentSet,
    /// Lyrics set to the solfa passage (swara sahitya)
    AuxLyric,
    /// Double-tempo passage (madhyama kala sahityam)
    MediumTempo,
    /// Text that could not be attributed to a labelled section
    Other,
}

impl SectionKind {
    /// Title-cased display name, e.g. `Sub Refrain`.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKind::Refrain => "Refrain",
            SectionKind::SubRefrain => "Sub Refrain",
            SectionKind::Verse => "Verse",
            SectionKind::CompositeVerse => "Composite Verse",
            SectionKind::OrnamentSet => "Ornament Set",
            SectionKind::AuxLyric => "Aux Lyric",
            SectionKind::MediumTempo => "Medium Tempo",
            SectionKind::Other => "Other",
        }
    }

    /// Whether sections of this kind may be split into sub-sections by
    /// per-line raga markers.
    pub fn is_verse_type(&self) -> bool {
        matches!(self, SectionKind::Verse | SectionKind::CompositeVerse)
    }
}

/// Label of a commentary block that ends the lyric window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryLabel {
    /// Meaning / translation
    Meaning,
    /// Free-form notes
    Notes,
    /// Short summary
    Gist,
    /// Word-by-word split (pada ccheda)
    WordDivision,
    /// Alternate readings
    Variations,
}

impl BoundaryLabel {
    /// Stable upper-case code.
    pub fn code(&self) -> &'static str {
        match self {
            BoundaryLabel::Meaning => "MEANING",
            BoundaryLabel::Notes => "NOTES",
            BoundaryLabel::Gist => "GIST",
            BoundaryLabel::WordDivision => "WORD_DIVISION",
            BoundaryLabel::Variations => "VARIATIONS",
        }
    }
}

/// A canonical section of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSection {
    /// Structural role
    pub section_kind: SectionKind,
    /// 1-based position; increases by one per emitted section
    pub order: u32,
    /// Human label, e.g. "Verse 2"
    pub label: String,
    /// Section text
    pub text: String,
    /// Start offset (chars) in the parser input
    pub start_offset: usize,
    /// End offset (chars, exclusive) in the parser input
    pub end_offset: usize,
}

/// One section of a lyric variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSection {
    /// Order of the canonical section this text belongs to
    pub section_order: u32,
    /// Lyric text in the variant's script
    pub text: String,
}

/// The lyrics of the composition in one language and script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricVariant {
    /// Language code (sa, hi, ta, te, kn, ml, en)
    pub language: String,
    /// Script
    pub script: Script,
    /// Sections, ascending by `section_order`
    pub sections: Vec<VariantSection>,
}

impl LyricVariant {
    /// True when no section carries text.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.text.trim().is_empty())
    }
}

/// Where commentary begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBoundary {
    /// Kind of commentary
    pub label: BoundaryLabel,
    /// Start offset (chars) of the boundary label
    pub start_offset: usize,
    /// End offset (chars, exclusive) of the boundary label
    pub end_offset: usize,
}

/// Everything the structure parser recovers from one segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureParseResult {
    /// Canonical sections in order
    pub sections: Vec<DetectedSection>,
    /// Lyric variants, each with at least one non-empty section
    pub lyric_variants: Vec<LyricVariant>,
    /// Boundaries sorted by start offset
    pub metadata_boundaries: Vec<MetadataBoundary>,
}

impl StructureParseResult {
    /// True when nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.lyric_variants.is_empty() && self.metadata_boundaries.is_empty()
    }

    /// Offset where the lyric window ends: the earliest boundary's start.
    pub fn lyric_window_end(&self) -> Option<usize> {
        self.metadata_boundaries.first().map(|b| b.start_offset)
    }
}
