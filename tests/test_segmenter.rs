//! Integration tests for multi-composition document segmentation.
//!
//! Documents are built from mock spans laid out the way anthology pages
//! print: a large title near the top, a raga/tala line, then lyrics.

use kriti_oxide::config::SegmenterConfig;
use kriti_oxide::layout::{BoundingBox, Document, DocumentSegmenter, Page, TextSpan};

// ============================================================================
// Helper Functions for Creating Mock Data
// ============================================================================

fn mock_span(text: &str, page: usize, y: f32, size: f32) -> TextSpan {
    TextSpan::new(text, page, BoundingBox::new(60.0, y, 480.0, y + size), size, "Times-Roman")
}

fn composition_page(page: usize, title: &str, bold: bool, title_size: f32) -> Page {
    let mut title_span = mock_span(title, page, 60.0, title_size);
    if bold {
        title_span = title_span.bold();
    }
    Page::new(595.0, 842.0)
        .with_span(title_span)
        .with_span(mock_span("Raga: Kalyani - Tala: Adi", page, 90.0, 12.0))
        .with_span(mock_span("Pallavi", page, 130.0, 12.0))
        .with_span(mock_span("vanajaksha ninne kori", page, 146.0, 12.0))
        .with_span(mock_span("Charanam", page, 180.0, 12.0))
        .with_span(mock_span("sarasija nabha murare", page, 196.0, 12.0))
}

fn lyric_page(page: usize) -> Page {
    Page::new(595.0, 842.0)
        .with_span(mock_span("continued verse text of the kriti", page, 100.0, 12.0))
        .with_span(mock_span("more verse text on the same page", page, 116.0, 12.0))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_one_segment_per_title() {
    let doc = Document::new(vec![
        composition_page(0, "Vanajaksha", true, 18.0),
        lyric_page(1),
        composition_page(2, "Sarasiruha", true, 18.0),
        composition_page(3, "Ninnukori", true, 18.0),
    ]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert!(!report.fallback);
    assert!(report.bold_required);
    assert_eq!(report.threshold, Some(1.30));
    assert_eq!(report.body_font_size, 12.0);

    let titles: Vec<&str> = report.segments.iter().map(|s| s.title_text.as_str()).collect();
    assert_eq!(titles, vec!["Vanajaksha", "Sarasiruha", "Ninnukori"]);

    let ranges: Vec<String> = report.segments.iter().map(|s| s.page_range()).collect();
    assert_eq!(ranges, vec!["1-2", "3", "4"]);
    assert!(report.segments[0].body_text.contains("continued verse text"));
    assert!(!report.segments[1].body_text.contains("continued verse text"));
}

#[test]
fn test_segments_cover_pages_in_order() {
    let doc = Document::new(vec![
        composition_page(0, "First", true, 18.0),
        lyric_page(1),
        lyric_page(2),
        composition_page(3, "Second", true, 18.0),
        lyric_page(4),
    ]);
    let segments = DocumentSegmenter::new().segment(&doc);

    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].start_page, segments[0].end_page), (0, 2));
    assert_eq!((segments[1].start_page, segments[1].end_page), (3, 4));
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_page + 1, pair[1].start_page);
    }
}

#[test]
fn test_contents_page_is_skipped() {
    let toc = Page::new(595.0, 842.0)
        .with_span(mock_span("Contents", 0, 40.0, 18.0).bold())
        .with_span(mock_span("Vanajaksha . . . . . . . . 2", 0, 100.0, 12.0))
        .with_span(mock_span("Sarasiruha . . . . . . . . 3", 0, 116.0, 12.0))
        .with_span(mock_span("Ninnukori . . . . . . . . 4", 0, 132.0, 12.0));
    let doc = Document::new(vec![
        toc,
        composition_page(1, "Vanajaksha", true, 18.0),
        composition_page(2, "Sarasiruha", true, 18.0),
    ]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert_eq!(report.toc_pages, vec![0]);
    assert_eq!(report.segments.len(), 2);
    assert_eq!(report.segments[0].title_text, "Vanajaksha");
}

#[test]
fn test_size_only_pass_without_bold() {
    let doc = Document::new(vec![
        composition_page(0, "Vanajaksha", false, 16.0),
        composition_page(1, "Sarasiruha", false, 16.0),
    ]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert!(!report.fallback);
    assert!(!report.bold_required);
    assert_eq!(report.segments.len(), 2);
}

#[test]
fn test_unbolded_top_of_page_titles_without_metadata() {
    let page = |page: usize, title: &str| {
        Page::new(595.0, 842.0)
            .with_span(mock_span(title, page, 40.0, 16.0))
            .with_span(mock_span("vanajaksha ninne kori", page, 120.0, 12.0))
            .with_span(mock_span("sarasija nabha murare", page, 136.0, 12.0))
    };
    let doc = Document::new(vec![page(0, "Vanajaksha"), page(1, "Sarasiruha")]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert!(!report.fallback);
    assert!(!report.bold_required);
    assert_eq!(report.segments.len(), 2);
    assert_eq!(report.segments[1].title_text, "Sarasiruha");
}

#[test]
fn test_lower_ladder_rung_finds_smaller_titles() {
    // 13 / 12 passes only the 1.05 rung.
    let doc = Document::new(vec![
        composition_page(0, "Vanajaksha", true, 13.0),
        composition_page(1, "Sarasiruha", true, 13.0),
    ]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert_eq!(report.threshold, Some(1.05));
    assert_eq!(report.segments.len(), 2);
}

#[test]
fn test_uniform_document_degrades_to_one_segment() {
    let doc = Document::new(vec![lyric_page(0), lyric_page(1), lyric_page(2)]);
    let report = DocumentSegmenter::new().analyze(&doc);

    assert!(report.fallback);
    assert_eq!(report.threshold, None);
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].start_page, 0);
    assert_eq!(report.segments[0].end_page, 2);
}

#[test]
fn test_single_title_is_not_enough() {
    let doc = Document::new(vec![composition_page(0, "Vanajaksha", true, 18.0), lyric_page(1)]);
    let segments = DocumentSegmenter::new().segment(&doc);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].page_range(), "1-2");
}

#[test]
fn test_min_titles_configurable() {
    let doc = Document::new(vec![composition_page(0, "Vanajaksha", true, 18.0), lyric_page(1)]);
    let config = SegmenterConfig {
        min_titles: 1,
        ..SegmenterConfig::default()
    };
    let report = DocumentSegmenter::new().with_config(config).analyze(&doc);
    assert!(!report.fallback);
    assert_eq!(report.segments[0].title_text, "Vanajaksha");
}

#[test]
fn test_document_from_collaborator_json() {
    let json = r#"{
        "pages": [
            {"width": 595, "height": 842, "spans": [
                {"text": "Vanajaksha", "bbox": {"x0": 60, "y0": 60, "x1": 300, "y1": 78},
                 "font_size": 18, "font_name": "Times-Bold"},
                {"text": "Raga: Kalyani", "bbox": {"x0": 60, "y0": 90, "x1": 300, "y1": 102},
                 "font_size": 12},
                {"text": "vanajaksha ninne kori", "bbox": {"x0": 60, "y0": 120, "x1": 300, "y1": 132},
                 "font_size": 12}
            ]},
            {"width": 595, "height": 842, "spans": [
                {"text": "Sarasiruha", "bbox": {"x0": 60, "y0": 60, "x1": 300, "y1": 78},
                 "font_size": 18, "font_name": "Times-Bold"},
                {"text": "Raga: Nata", "bbox": {"x0": 60, "y0": 90, "x1": 300, "y1": 102},
                 "font_size": 12},
                {"text": "sarasiruhasana priye", "bbox": {"x0": 60, "y0": 120, "x1": 300, "y1": 132},
                 "font_size": 12}
            ]}
        ]
    }"#;
    let doc = Document::from_json_str(json).unwrap();
    doc.validate().unwrap();
    assert_eq!(doc.pages[1].spans[0].page_index, 1);

    let segments = DocumentSegmenter::new().segment(&doc);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].title_text, "Sarasiruha");
    assert_eq!(segments[1].body_text, "Raga: Nata\nsarasiruhasana priye");
}
