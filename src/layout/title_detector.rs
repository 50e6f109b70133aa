//! Composition title detection using font size and weight.
//!
//! Titles are classified relative to the document's body font size rather
//! than against absolute sizes: the body size is the most common size by
//! character count, and a title must exceed it by a ratio taken from a
//! descending threshold ladder.
//!
//! The ladder runs twice. A candidate always has to sit near the top of its
//! page or be followed by a raga/tala line. The first pass also requires a
//! bold span; the second drops that for sources whose weight is not machine
//! detectable.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SegmenterConfig;
use crate::layout::assembler::visible_text;
use crate::layout::text_block::{BoundingBox, Document, Page, TextSpan};
use crate::layout::toc_detector::TocDetector;

lazy_static! {
    /// Raga/tala/deity label lines, including macron-split transliterations (r¯aga)
    static ref RE_METADATA_LINE: Regex = Regex::new(
        r"(?i)(?:r[\u{00AF}ā]?a+ga|rāga|राग|t[\u{00AF}ā]?a+l[.\u{1E37}]?\s*a|tāla|ताल|deity|kshetra|temple)"
    )
    .unwrap();
}

/// Which ladder pass produced a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderPass {
    /// Bold spans qualified by page position or a metadata line
    Bold,
    /// Any weight, qualified by page position or a metadata line
    SizeOnly,
}

/// A span accepted as a composition title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    /// Page holding the title
    pub page_index: usize,
    /// Index of the span within its page
    pub span_index: usize,
    /// Visible title text
    pub text: String,
    /// Position of the title span
    pub bbox: BoundingBox,
    /// Font size of the title span
    pub font_size: f32,
}

impl TitleCandidate {
    fn is_numeric(&self) -> bool {
        let t = self.text.trim();
        !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
    }

    fn text_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Outcome of title detection, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleDetection {
    /// Deduplicated titles in document order
    pub titles: Vec<TitleCandidate>,
    /// Body font size the thresholds were relative to
    pub body_font_size: f32,
    /// Winning threshold ratio, when a pass succeeded
    pub threshold: Option<f32>,
    /// Winning pass, when one succeeded
    pub pass: Option<LadderPass>,
    /// Candidates before deduplication at the winning threshold
    pub raw_candidates: usize,
    /// Pages excluded as tables of contents
    pub toc_pages: Vec<usize>,
}

/// Most common font size by character count, rounded to the nearest 0.5pt.
///
/// Ties go to the size seen first. Returns `default` when no span has a
/// positive size.
pub fn body_font_size(document: &Document, default: f32) -> f32 {
    let mut weights: IndexMap<i64, usize> = IndexMap::new();
    for span in document.spans() {
        let half_points = (span.font_size * 2.0).round() as i64;
        if half_points > 0 {
            *weights.entry(half_points).or_insert(0) += span.char_count();
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (&size, &weight) in &weights {
        if best.map_or(true, |(_, w)| weight > w) {
            best = Some((size, weight));
        }
    }
    best.map_or(default, |(size, _)| size as f32 / 2.0)
}

/// Finds composition titles in a document.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    config: SegmenterConfig,
    toc: TocDetector,
    decode_legacy: bool,
}

impl TitleDetector {
    /// Create a detector from segmenter settings.
    pub fn new(config: SegmenterConfig) -> Self {
        let toc = TocDetector::with_min_leaders(config.toc_min_leaders);
        Self {
            config,
            toc,
            decode_legacy: true,
        }
    }

    /// Decode legacy-font spans before matching metadata lines.
    pub fn with_legacy_decoding(mut self, enable: bool) -> Self {
        self.decode_legacy = enable;
        self
    }

    /// Run both ladder passes and return the first qualifying title set.
    pub fn detect(&self, document: &Document) -> TitleDetection {
        let body = body_font_size(document, self.config.default_body_font_size);
        let toc_pages: Vec<usize> = document
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| self.toc.is_toc_page(page))
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &toc_pages {
            log::debug!(
                "Page {} is a table of contents ({} entries)",
                idx + 1,
                self.toc.entries(&document.pages[idx]).len()
            );
        }

        let mut detection = TitleDetection {
            titles: Vec::new(),
            body_font_size: body,
            threshold: None,
            pass: None,
            raw_candidates: 0,
            toc_pages,
        };

        for pass in [LadderPass::Bold, LadderPass::SizeOnly] {
            for &ratio in &self.config.threshold_ladder {
                let min_size = body * ratio;
                let candidates = self.candidates(document, &detection.toc_pages, min_size, pass);
                let titles = self.deduplicate(&candidates);

                if titles.len() >= self.config.min_titles {
                    log::info!(
                        "Title detection succeeded: pass {:?}, ratio {}, min size {:.2}, body size {}, {} raw candidates, {} titles",
                        pass,
                        ratio,
                        min_size,
                        body,
                        candidates.len(),
                        titles.len()
                    );
                    detection.titles = titles;
                    detection.threshold = Some(ratio);
                    detection.pass = Some(pass);
                    detection.raw_candidates = candidates.len();
                    return detection;
                }
            }
        }

        log::debug!("No title threshold produced {} titles", self.config.min_titles);
        detection
    }

    fn candidates(
        &self,
        document: &Document,
        toc_pages: &[usize],
        min_size: f32,
        pass: LadderPass,
    ) -> Vec<TitleCandidate> {
        let mut out = Vec::new();
        for (page_index, page) in document.pages.iter().enumerate() {
            if toc_pages.contains(&page_index) {
                continue;
            }
            for (span_index, span) in page.spans.iter().enumerate() {
                if span.is_blank() || span.font_size < min_size {
                    continue;
                }
                let weight_ok = match pass {
                    LadderPass::Bold => span.looks_bold(),
                    LadderPass::SizeOnly => true,
                };
                let qualified = weight_ok
                    && (self.near_top(page, span) || self.has_metadata_nearby(page, span));
                if qualified {
                    out.push(TitleCandidate {
                        page_index,
                        span_index,
                        text: visible_text(span, self.decode_legacy).trim().to_string(),
                        bbox: span.bbox,
                        font_size: span.font_size,
                    });
                }
            }
        }
        out
    }

    fn near_top(&self, page: &Page, span: &TextSpan) -> bool {
        span.bbox.y0 < page.height * self.config.top_of_page_fraction
    }

    /// A raga/tala line starts within the metadata window below the span.
    fn has_metadata_nearby(&self, page: &Page, title: &TextSpan) -> bool {
        let limit = title.bbox.y1 + self.config.metadata_window;
        page.spans.iter().any(|span| {
            span.bbox.y0 > title.bbox.y1
                && span.bbox.y0 < limit
                && RE_METADATA_LINE.is_match(&visible_text(span, self.decode_legacy))
        })
    }

    /// Collapse candidates on the same page within the dedup distance.
    ///
    /// A title is often repeated in several styles or shares its height with
    /// a serial number; each group keeps its longest non-numeric text.
    pub fn deduplicate(&self, candidates: &[TitleCandidate]) -> Vec<TitleCandidate> {
        let mut out = Vec::new();
        let mut group: Vec<&TitleCandidate> = Vec::new();

        for candidate in candidates {
            let joins = group.last().is_some_and(|prev| {
                prev.page_index == candidate.page_index
                    && (prev.bbox.y0 - candidate.bbox.y0).abs() < self.config.dedup_distance
            });
            if !joins && !group.is_empty() {
                out.extend(pick_best(&group));
                group.clear();
            }
            group.push(candidate);
        }
        out.extend(pick_best(&group));
        out
    }
}

/// Longest non-numeric text in a group, first wins ties.
fn pick_best(group: &[&TitleCandidate]) -> Option<TitleCandidate> {
    let textual: Vec<&TitleCandidate> = group.iter().copied().filter(|c| !c.is_numeric()).collect();
    let pool = if textual.is_empty() { group.to_vec() } else { textual };

    let mut best: Option<&TitleCandidate> = None;
    for candidate in pool {
        if best.map_or(true, |b| candidate.text_len() > b.text_len()) {
            best = Some(candidate);
        }
    }
    best.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, y0: f32, size: f32) -> TextSpan {
        TextSpan::new(text, 0, BoundingBox::new(50.0, y0, 400.0, y0 + size), size, "Times")
    }

    fn candidate(text: &str, page: usize, y0: f32) -> TitleCandidate {
        TitleCandidate {
            page_index: page,
            span_index: 0,
            text: text.to_string(),
            bbox: BoundingBox::new(0.0, y0, 100.0, y0 + 16.0),
            font_size: 16.0,
        }
    }

    #[test]
    fn test_body_font_size_weighted_by_chars() {
        let doc = Document::new(vec![Page::new(600.0, 800.0)
            .with_span(span("Title", 50.0, 18.0))
            .with_span(span("a much longer body line of lyric text", 80.0, 12.2))
            .with_span(span("another body line", 100.0, 11.9))]);
        assert_eq!(body_font_size(&doc, 10.0), 12.0);
    }

    #[test]
    fn test_body_font_size_default_when_empty() {
        let doc = Document::new(vec![Page::new(600.0, 800.0)]);
        assert_eq!(body_font_size(&doc, 12.0), 12.0);
    }

    #[test]
    fn test_body_font_size_tie_keeps_first() {
        let doc = Document::new(vec![Page::new(600.0, 800.0)
            .with_span(span("abcd", 50.0, 14.0))
            .with_span(span("wxyz", 80.0, 10.0))]);
        assert_eq!(body_font_size(&doc, 12.0), 14.0);
    }

    #[test]
    fn test_metadata_pattern_variants() {
        for line in ["Raga: Kalyani", "r\u{00AF}aga: Todi", "rāgaṁ kalyāṇi", "tāla: ādi", "राग", "Deity: Siva"] {
            assert!(RE_METADATA_LINE.is_match(line), "{}", line);
        }
        assert!(!RE_METADATA_LINE.is_match("akhilandesvari raksha mam"));
    }

    #[test]
    fn test_dedup_keeps_longest_non_numeric() {
        let detector = TitleDetector::new(SegmenterConfig::default());
        let titles = detector.deduplicate(&[
            candidate("12", 0, 100.0),
            candidate("Akhilandesvari", 0, 110.0),
            candidate("Akhila", 0, 120.0),
            candidate("Vatapi", 1, 100.0),
        ]);
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].text, "Akhilandesvari");
        assert_eq!(titles[1].text, "Vatapi");
    }

    #[test]
    fn test_dedup_numeric_only_group_keeps_number() {
        let detector = TitleDetector::new(SegmenterConfig::default());
        let titles = detector.deduplicate(&[candidate("7", 0, 100.0)]);
        assert_eq!(titles[0].text, "7");
    }

    #[test]
    fn test_dedup_distance_separates_titles_on_same_page() {
        let detector = TitleDetector::new(SegmenterConfig::default());
        let titles = detector.deduplicate(&[candidate("First", 0, 100.0), candidate("Second", 0, 400.0)]);
        assert_eq!(titles.len(), 2);
    }

    #[test]
    fn test_bold_pass_uses_top_of_page() {
        let page = |title: &str| {
            Page::new(600.0, 800.0)
                .with_span(span(title, 40.0, 18.0).bold())
                .with_span(span("pallavi line of lyric text", 200.0, 12.0))
        };
        let doc = Document::new(vec![page("First"), page("Second")]);
        let detection = TitleDetector::new(SegmenterConfig::default()).detect(&doc);
        assert_eq!(detection.pass, Some(LadderPass::Bold));
        assert_eq!(detection.threshold, Some(1.30));
        assert_eq!(detection.titles.len(), 2);
    }

    #[test]
    fn test_size_only_pass_off_top_needs_metadata() {
        let page = |title: &str, with_meta: bool| {
            let mut p = Page::new(600.0, 800.0).with_span(span(title, 300.0, 16.0));
            if with_meta {
                p = p.with_span(span("Raga: Kalyani", 330.0, 12.0));
            }
            p.with_span(span("body text body text body text body text", 400.0, 12.0))
        };
        let doc = Document::new(vec![page("First", true), page("Second", true), page("Third", false)]);
        let detection = TitleDetector::new(SegmenterConfig::default()).detect(&doc);
        assert_eq!(detection.pass, Some(LadderPass::SizeOnly));
        let texts: Vec<&str> = detection.titles.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second"]);
    }

    #[test]
    fn test_size_only_pass_accepts_top_of_page() {
        let page = |title: &str| {
            Page::new(600.0, 800.0)
                .with_span(span(title, 40.0, 16.0))
                .with_span(span("body text body text body text body text", 200.0, 12.0))
        };
        let doc = Document::new(vec![page("First"), page("Second")]);
        let detection = TitleDetector::new(SegmenterConfig::default()).detect(&doc);
        assert_eq!(detection.pass, Some(LadderPass::SizeOnly));
        assert_eq!(detection.titles.len(), 2);
    }
}
