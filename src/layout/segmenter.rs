//! Multi-composition document segmentation.
//!
//! A segment runs from one title to the page before the next title. When two
//! titles share a page, the first segment stops at the second title's
//! vertical position. Documents without detectable titles become a single
//! segment; segmentation never fails.

use crate::config::SegmenterConfig;
use crate::layout::assembler::LineAssembler;
use crate::layout::text_block::{Document, TextSpan};
use crate::layout::title_detector::{LadderPass, TitleCandidate, TitleDetector};

/// The region of a document holding one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSegment {
    /// First page (0-based)
    pub start_page: usize,
    /// Last page (0-based, inclusive)
    pub end_page: usize,
    /// Title as printed
    pub title_text: String,
    /// Body text, lines joined with newlines
    pub body_text: String,
    /// Spans the body was assembled from
    pub body_spans: Vec<TextSpan>,
}

impl CompositionSegment {
    /// Human-readable 1-based page range: `"5"` or `"5-7"`.
    pub fn page_range(&self) -> String {
        if self.start_page == self.end_page {
            format!("{}", self.start_page + 1)
        } else {
            format!("{}-{}", self.start_page + 1, self.end_page + 1)
        }
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page + 1
    }
}

/// Segments plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Segments in document order
    pub segments: Vec<CompositionSegment>,
    /// Body font size used for thresholds
    pub body_font_size: f32,
    /// Winning threshold ratio, absent on fallback
    pub threshold: Option<f32>,
    /// Whether the winning pass required bold titles
    pub bold_required: bool,
    /// Pages skipped as tables of contents
    pub toc_pages: Vec<usize>,
    /// True when no titles were found and the whole document became one segment
    pub fallback: bool,
}

/// Splits a document into per-composition segments.
///
/// # Example
///
/// ```
/// use kriti_oxide::layout::{BoundingBox, Document, DocumentSegmenter, Page, TextSpan};
///
/// let body = TextSpan::new("some lyric text", 0, BoundingBox::new(50.0, 300.0, 300.0, 312.0), 12.0, "Times");
/// let doc = Document::new(vec![Page::new(600.0, 800.0).with_span(body)]);
///
/// let segments = DocumentSegmenter::new().segment(&doc);
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].page_range(), "1");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentSegmenter {
    config: SegmenterConfig,
    decode_legacy: bool,
}

impl Default for DocumentSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSegmenter {
    /// Segmenter with default settings.
    pub fn new() -> Self {
        Self {
            config: SegmenterConfig::default(),
            decode_legacy: true,
        }
    }

    /// Replace the segmenter settings.
    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable legacy font decoding of titles and bodies.
    pub fn with_legacy_decoding(mut self, enable: bool) -> Self {
        self.decode_legacy = enable;
        self
    }

    fn assembler(&self) -> LineAssembler {
        LineAssembler::new(self.config.line_tolerance).with_legacy_decoding(self.decode_legacy)
    }

    /// Split a document into composition segments.
    pub fn segment(&self, document: &Document) -> Vec<CompositionSegment> {
        self.analyze(document).segments
    }

    /// Split a document and report how the split was made.
    pub fn analyze(&self, document: &Document) -> Segmentation {
        let detection = TitleDetector::new(self.config.clone())
            .with_legacy_decoding(self.decode_legacy)
            .detect(document);

        let mut report = Segmentation {
            segments: Vec::new(),
            body_font_size: detection.body_font_size,
            threshold: detection.threshold,
            bold_required: detection.pass == Some(LadderPass::Bold),
            toc_pages: detection.toc_pages,
            fallback: false,
        };

        if document.pages.is_empty() {
            return report;
        }

        if detection.titles.is_empty() {
            log::warn!(
                "No title boundaries detected (body size {}); treating document as one segment",
                detection.body_font_size
            );
            report.segments.push(self.single_segment(document));
            report.fallback = true;
            return report;
        }

        report.segments = self.build_segments(document, &detection.titles);
        log::info!(
            "Segmentation complete: {} pages, {} segments, body size {}",
            document.page_count(),
            report.segments.len(),
            report.body_font_size
        );
        report
    }

    fn build_segments(&self, document: &Document, titles: &[TitleCandidate]) -> Vec<CompositionSegment> {
        let assembler = self.assembler();
        let last_page = document.page_count() - 1;
        let mut segments = Vec::with_capacity(titles.len());

        for (i, title) in titles.iter().enumerate() {
            let next = titles.get(i + 1);
            let end_page = match next {
                Some(next) if next.page_index > title.page_index => next.page_index - 1,
                Some(_) => title.page_index,
                None => last_page,
            };
            let shared_page_stop = next
                .filter(|n| n.page_index == title.page_index)
                .map(|n| n.bbox.y0);

            let mut body_spans = Vec::new();
            for page_index in title.page_index..=end_page {
                let Some(page) = document.pages.get(page_index) else {
                    break;
                };
                for span in &page.spans {
                    if page_index == title.page_index && span.bbox.y0 <= title.bbox.y1 {
                        continue;
                    }
                    if shared_page_stop.is_some_and(|stop| span.bbox.y0 >= stop) {
                        break;
                    }
                    body_spans.push(span.clone());
                }
            }

            segments.push(CompositionSegment {
                start_page: title.page_index,
                end_page,
                title_text: title.text.clone(),
                body_text: assembler.assemble(&body_spans),
                body_spans,
            });
        }

        segments
    }

    fn single_segment(&self, document: &Document) -> CompositionSegment {
        let assembler = self.assembler();
        let mut spans = document.spans().filter(|s| !s.is_blank());
        let title_text = spans
            .next()
            .map(|s| assembler.span_text(s).trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        CompositionSegment {
            start_page: 0,
            end_page: document.page_count() - 1,
            title_text,
            body_text: assembler.assemble(document.spans()),
            body_spans: spans.cloned().collect(),
        }
    }
}
