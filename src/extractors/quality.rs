//! Extracted-text quality checks.
//!
//! Decides whether a document's text layer is too thin or too corrupted to
//! segment, in which case the caller should hand the source to an OCR
//! collaborator and feed the recognised page texts back through
//! [`ExtractionPipeline::process_page_texts`](crate::pipeline::ExtractionPipeline::process_page_texts).

use crate::layout::text_block::Document;
use crate::text::{detect_script, Script, ScriptCounts};

/// Pages with more non-space characters than this carry a text layer.
pub const MIN_TEXT_PAGE_CHARS: usize = 50;

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Why OCR is recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrReason {
    /// Fewer than half the pages carry a text layer
    LittleText,
    /// Devanagari text with a high share of replacement characters
    GarbledDevanagari,
    /// Any text dominated by replacement characters
    GarbledText,
}

/// Character statistics of a document's text layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextQuality {
    /// Pages in the document
    pub total_pages: usize,
    /// Pages with more than [`MIN_TEXT_PAGE_CHARS`] non-space characters
    pub text_pages: usize,
    /// Non-whitespace characters
    pub non_space_chars: usize,
    /// U+FFFD occurrences
    pub replacement_chars: usize,
    /// Characters in the Devanagari block
    pub devanagari_chars: usize,
    /// Majority script of the whole text
    pub script: Option<Script>,
}

impl TextQuality {
    /// Measure a document.
    pub fn measure(document: &Document) -> Self {
        let page_texts: Vec<String> = document.pages.iter().map(|p| p.plain_text()).collect();
        let text_pages = page_texts
            .iter()
            .filter(|t| t.chars().filter(|c| !c.is_whitespace()).count() > MIN_TEXT_PAGE_CHARS)
            .count();

        let all = page_texts.join("\n");
        Self {
            total_pages: document.page_count(),
            text_pages,
            non_space_chars: all.chars().filter(|c| !c.is_whitespace()).count(),
            replacement_chars: all.chars().filter(|&c| c == REPLACEMENT_CHAR).count(),
            devanagari_chars: ScriptCounts::of(&all).get(Script::Devanagari),
            script: detect_script(&all),
        }
    }

    /// Share of non-space characters that are U+FFFD.
    pub fn replacement_ratio(&self) -> f32 {
        self.replacement_chars as f32 / self.non_space_chars.max(1) as f32
    }

    fn looks_devanagari(&self) -> bool {
        self.script == Some(Script::Devanagari) || self.devanagari_chars >= 20
    }

    /// The first applicable reason to prefer OCR, if any.
    pub fn ocr_reason(&self) -> Option<OcrReason> {
        if self.text_pages * 2 < self.total_pages || self.total_pages == 0 {
            return Some(OcrReason::LittleText);
        }
        let ratio = self.replacement_ratio();
        if self.looks_devanagari() && ratio >= 0.05 && self.replacement_chars >= 20 {
            return Some(OcrReason::GarbledDevanagari);
        }
        if ratio >= 0.20 && self.replacement_chars >= 200 {
            return Some(OcrReason::GarbledText);
        }
        None
    }
}

/// Whether the caller should run OCR instead of using the text layer.
pub fn needs_ocr(document: &Document) -> bool {
    TextQuality::measure(document).ocr_reason().is_some()
}
