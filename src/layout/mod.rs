//! Layout analysis over positioned text spans.
//!
//! This module turns the page-extraction collaborator's spans into
//! per-composition regions:
//! - Line assembly (spans → visual lines → text, legacy glyph runs decoded)
//! - Table of contents page detection
//! - Body font size and adaptive title detection
//! - Segmentation into one region per composition

pub mod assembler;
pub mod segmenter;
pub mod text_block;
pub mod title_detector;
pub mod toc_detector;

// Re-export main types
pub use assembler::{Line, LineAssembler};
pub use segmenter::{CompositionSegment, DocumentSegmenter, Segmentation};
pub use text_block::{BoundingBox, Document, Page, TextSpan};
pub use title_detector::{body_font_size, LadderPass, TitleCandidate, TitleDetection, TitleDetector};
pub use toc_detector::{TocDetector, TocEntry};
