//! Positioned text representation handed over by the page-extraction collaborator.
//!
//! Coordinates use a top-left origin: `y` grows down the page, so a smaller
//! `y0` means "higher on the page".

use crate::error::{Error, Result};
use crate::fonts::is_legacy_font;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Axis-aligned bounding box of a span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical centre.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

/// A contiguous run of same-styled text.
///
/// Spans are immutable once produced; within a page they arrive in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The span's text as extracted (possibly raw legacy glyph codes)
    pub text: String,
    /// Zero-based index of the owning page
    #[serde(default)]
    pub page_index: usize,
    /// Bounding box of the entire span
    pub bbox: BoundingBox,
    /// Font size in points
    pub font_size: f32,
    /// Font name/family
    #[serde(default)]
    pub font_name: String,
    /// Bold weight as reported by the extractor
    #[serde(default)]
    pub is_bold: bool,
    /// Italic style as reported by the extractor
    #[serde(default)]
    pub is_italic: bool,
}

impl TextSpan {
    /// Build a regular-weight span.
    pub fn new(
        text: impl Into<String>,
        page_index: usize,
        bbox: BoundingBox,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            page_index,
            bbox,
            font_size,
            font_name: font_name.into(),
            is_bold: false,
            is_italic: false,
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the span as italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Bold by flag or by a weight word in the font name.
    pub fn looks_bold(&self) -> bool {
        self.is_bold || self.font_name.to_ascii_lowercase().contains("bold")
    }

    /// Whether the span is set in a legacy glyph-substitution font.
    pub fn is_legacy(&self) -> bool {
        is_legacy_font(&self.font_name)
    }

    /// Span text without surrounding padding.
    ///
    /// Legacy fonts reuse control codes 9 to 13 as glyphs, so only spaces
    /// are stripped from their raw text.
    pub fn trimmed_text(&self) -> &str {
        if self.is_legacy() {
            self.text.trim_matches(' ')
        } else {
            self.text.trim()
        }
    }

    /// Number of characters in the span, excluding surrounding whitespace.
    pub fn char_count(&self) -> usize {
        self.trimmed_text().chars().count()
    }

    /// True when the span carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.trimmed_text().is_empty()
    }
}

/// One page: its spans in reading order plus page dimensions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

impl Page {
    /// Create an empty page.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            spans: Vec::new(),
        }
    }

    /// Append a span, returning the page for chaining.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.spans.push(span);
        self
    }

    /// Concatenated span text of the page, one span per line.
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An ordered list of pages plus a content checksum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order
    pub pages: Vec<Page>,
    /// Content checksum supplied by the collaborator, if any
    #[serde(default)]
    pub checksum: Option<String>,
}

impl Document {
    /// Wrap pages into a document, computing its checksum.
    pub fn new(pages: Vec<Page>) -> Self {
        let mut doc = Self {
            pages,
            checksum: None,
        };
        doc.checksum = Some(doc.compute_checksum());
        doc
    }

    /// Load a document serialized as JSON by the page-extraction collaborator.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut doc: Document = serde_json::from_str(json)?;
        doc.assign_page_indices();
        doc.validate()?;
        Ok(doc)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Iterate over every span of every page.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.pages.iter().flat_map(|p| p.spans.iter())
    }

    /// The supplied checksum, or one computed from content.
    pub fn checksum(&self) -> String {
        self.checksum
            .clone()
            .unwrap_or_else(|| self.compute_checksum())
    }

    /// SHA-256 over page dimensions and span text, hex encoded.
    pub fn compute_checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for page in &self.pages {
            hasher.update(page.width.to_le_bytes());
            hasher.update(page.height.to_le_bytes());
            for span in &page.spans {
                hasher.update(span.text.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update([0xffu8]);
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Spans deserialized without an explicit page index inherit their page's position.
    fn assign_page_indices(&mut self) {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            for span in &mut page.spans {
                if span.page_index == 0 {
                    span.page_index = idx;
                }
            }
        }
    }

    /// Reject documents the segmenter cannot interpret.
    pub fn validate(&self) -> Result<()> {
        for (idx, page) in self.pages.iter().enumerate() {
            if !(page.height.is_finite() && page.height >= 0.0) {
                return Err(Error::InvalidDocument(format!(
                    "page {} has invalid height {}",
                    idx, page.height
                )));
            }
            for span in &page.spans {
                if span.page_index != idx {
                    return Err(Error::InvalidDocument(format!(
                        "span {:?} claims page {} but sits on page {}",
                        span.text, span.page_index, idx
                    )));
                }
                if !span.font_size.is_finite() {
                    return Err(Error::InvalidDocument(format!(
                        "span {:?} on page {} has non-finite font size",
                        span.text, idx
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, page: usize) -> TextSpan {
        TextSpan::new(text, page, BoundingBox::new(10.0, 10.0, 100.0, 22.0), 12.0, "Times")
    }

    #[test]
    fn test_bbox_geometry() {
        let b = BoundingBox::new(10.0, 20.0, 50.0, 40.0);
        assert_eq!(b.width(), 40.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.center_y(), 30.0);
    }

    #[test]
    fn test_checksum_is_stable_and_content_sensitive() {
        let a = Document::new(vec![Page::new(600.0, 800.0).with_span(span("pallavi", 0))]);
        let b = Document::new(vec![Page::new(600.0, 800.0).with_span(span("pallavi", 0))]);
        let c = Document::new(vec![Page::new(600.0, 800.0).with_span(span("caranam", 0))]);

        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
        assert_eq!(a.checksum().len(), 64);
    }

    #[test]
    fn test_json_assigns_page_indices() {
        let json = r#"{"pages": [
            {"width": 600, "height": 800, "spans": []},
            {"width": 600, "height": 800, "spans": [
                {"text": "Title", "bbox": {"x0": 0, "y0": 0, "x1": 50, "y1": 20}, "font_size": 18}
            ]}
        ]}"#;
        let doc = Document::from_json_str(json).unwrap();
        assert_eq!(doc.pages[1].spans[0].page_index, 1);
        assert!(!doc.pages[1].spans[0].is_bold);
    }

    #[test]
    fn test_validate_rejects_misplaced_span() {
        let doc = Document {
            pages: vec![Page::new(600.0, 800.0).with_span(span("x", 3))],
            checksum: None,
        };
        assert!(matches!(doc.validate(), Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_bold_from_font_name() {
        let s = TextSpan::new("x", 0, BoundingBox::default(), 12.0, "Times-BoldItalic");
        assert!(s.looks_bold());
        assert!(!span("x", 0).looks_bold());
        assert!(span("x", 0).bold().looks_bold());
    }

    #[test]
    fn test_char_count_ignores_padding() {
        assert_eq!(span("  rāga  ", 0).char_count(), 4);
        assert!(span("   ", 0).is_blank());
    }

    #[test]
    fn test_legacy_control_glyphs_are_not_padding() {
        let font = "Velthuis-dvng10";
        let repha = TextSpan::new("\u{0D}", 0, BoundingBox::default(), 12.0, font);
        assert!(!repha.is_blank());
        assert_eq!(repha.char_count(), 1);

        let half_ka = TextSpan::new(" \u{0A}k ", 0, BoundingBox::default(), 12.0, font);
        assert_eq!(half_ka.trimmed_text(), "\u{0A}k");
        assert!(span("\u{0D}", 0).is_blank());
    }
}
