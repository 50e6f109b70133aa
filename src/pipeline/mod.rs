//! Extraction pipeline: positioned spans in, canonical records out.
//!
//! ```text
//! Document (spans from the page-extraction collaborator)
//!     ↓
//! [DocumentSegmenter] (title detection → CompositionSegment[])
//!     ↓
//! [normalize] (diacritic repair)
//!     ↓
//! [FieldExtractor] (header fields from the first characters)
//!     ↓
//! [StructureParser] (sections, lyric variants, boundaries)
//!     ↓
//! CanonicalExtraction[]
//! ```
//!
//! Page texts recognised by an OCR collaborator enter at the normalisation
//! step through [`ExtractionPipeline::process_page_texts`], one record per
//! non-empty page.

pub mod canonical;

pub use canonical::{
    truncate_utf8, CanonicalExtraction, CanonicalLyricSection, CanonicalLyricVariant,
    CanonicalMetadataBoundary, CanonicalRaga, CanonicalSection, ExtractionMethod, FieldPatch,
    UNKNOWN,
};

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::config::ExtractionConfig;
use crate::extractors::{FieldExtractor, HeaderFieldExtractor};
use crate::layout::{CompositionSegment, Document, DocumentSegmenter};
use crate::structure::{LyricVariant, StructureParser, VariantSection};
use crate::text::{detect_script, devanagari_to_iast, normalize, Script};

/// Source identifier used when the caller supplies none.
pub const DEFAULT_SOURCE_ID: &str = "unknown";

/// Orchestrates segmentation, field extraction and structure parsing.
pub struct ExtractionPipeline {
    config: ExtractionConfig,
    parser: StructureParser,
    fields: Box<dyn FieldExtractor>,
    source_id: String,
    composer_hint: Option<String>,
}

impl ExtractionPipeline {
    /// Create a pipeline with the default header field extractor.
    pub fn new(config: ExtractionConfig) -> Self {
        let parser = StructureParser::new().with_config(config.parser.clone());
        Self {
            config,
            parser,
            fields: Box::new(HeaderFieldExtractor::new()),
            source_id: DEFAULT_SOURCE_ID.to_string(),
            composer_hint: None,
        }
    }

    /// Replace the metadata field extraction collaborator.
    pub fn with_field_extractor(mut self, extractor: Box<dyn FieldExtractor>) -> Self {
        self.fields = extractor;
        self
    }

    /// Identifier of the source anthology, copied onto every record.
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Composer to use when a header names none (single-composer anthologies).
    pub fn with_composer_hint(mut self, composer: impl Into<String>) -> Self {
        self.composer_hint = Some(composer.into());
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Segment a document and structure every composition in it.
    pub fn process_document(&self, document: &Document) -> Vec<CanonicalExtraction> {
        let segmenter = DocumentSegmenter::new()
            .with_config(self.config.segmenter.clone())
            .with_legacy_decoding(self.config.decode_legacy_fonts);
        let segments = segmenter.segment(document);
        let checksum = document.checksum();

        log::info!(
            "Processing {} segment(s) from {} page(s) using {}",
            segments.len(),
            document.page_count(),
            self.fields.name()
        );

        segments
            .iter()
            .map(|segment| self.process_segment(segment, &checksum, ExtractionMethod::PdfText))
            .collect()
    }

    /// Build one canonical record from a segment.
    ///
    /// # Arguments
    ///
    /// * `segment` - The composition region
    /// * `checksum` - Checksum of the source document
    /// * `method` - How the segment text was obtained
    pub fn process_segment(
        &self,
        segment: &CompositionSegment,
        checksum: &str,
        method: ExtractionMethod,
    ) -> CanonicalExtraction {
        let title_hint = self.prepare(&segment.title_text);
        let hint = Some(title_hint.trim()).filter(|t| !t.is_empty());
        self.build_record(
            &segment.body_text,
            hint,
            Some(segment.page_range()),
            checksum,
            method,
        )
    }

    /// Structure page texts recognised by an OCR collaborator.
    ///
    /// Each page with text becomes one record; blank pages are skipped.
    /// Keys are 0-based page indices.
    pub fn process_page_texts(&self, page_texts: &BTreeMap<usize, String>) -> Vec<CanonicalExtraction> {
        let checksum = page_texts_checksum(page_texts);
        page_texts
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(page, text)| {
                self.build_record(
                    text,
                    None,
                    Some((page + 1).to_string()),
                    &checksum,
                    ExtractionMethod::PdfOcr,
                )
            })
            .collect()
    }

    fn prepare(&self, text: &str) -> String {
        if self.config.normalize_text {
            normalize(text)
        } else {
            text.to_string()
        }
    }

    fn build_record(
        &self,
        raw_body: &str,
        title_hint: Option<&str>,
        page_range: Option<String>,
        checksum: &str,
        method: ExtractionMethod,
    ) -> CanonicalExtraction {
        let body = self.prepare(raw_body);
        let header: String = body.chars().take(self.config.header_window_chars).collect();
        let fields = self.fields.extract(&header, title_hint);

        let parsed = self.parser.parse(&body);
        let mut variants = parsed.lyric_variants.clone();
        if variants.is_empty() && !parsed.sections.is_empty() {
            variants.push(fallback_variant(&body, &parsed.sections));
        }

        let lyric_variants: Vec<CanonicalLyricVariant> = variants
            .iter()
            .filter_map(|v| CanonicalLyricVariant::from_variant(v, self.config.max_section_bytes))
            .collect();

        let primary_script = lyric_variants
            .first()
            .map(|v| v.script)
            .or_else(|| detect_script(&body))
            .unwrap_or(Script::Devanagari);

        let title = fields.title;
        let alternate_title = if primary_script == Script::Devanagari {
            Some(devanagari_to_iast(&title)).filter(|t| !t.is_empty() && *t != title)
        } else {
            None
        };

        let composer = fields
            .composer
            .or_else(|| self.composer_hint.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        log::debug!(
            "Structured {:?}: {} section(s), {} variant(s), {} boundary(ies)",
            title,
            parsed.sections.len(),
            lyric_variants.len(),
            parsed.metadata_boundaries.len()
        );

        CanonicalExtraction {
            title,
            alternate_title,
            composer,
            ragas: vec![CanonicalRaga {
                name: fields.raga.unwrap_or_else(|| UNKNOWN.to_string()),
                order: 1,
            }],
            tala: fields.tala.unwrap_or_else(|| UNKNOWN.to_string()),
            sections: parsed.sections.iter().map(CanonicalSection::from).collect(),
            lyric_variants,
            metadata_boundaries: parsed
                .metadata_boundaries
                .iter()
                .map(CanonicalMetadataBoundary::from)
                .collect(),
            deity: fields.deity,
            temple: fields.temple,
            source_id: self.source_id.clone(),
            extraction_method: method,
            extraction_timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            page_range,
            checksum: Some(checksum.to_string()).filter(|c| !c.is_empty()),
        }
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

/// A single variant built from the canonical sections when the parser found
/// no language-labelled or script-split variants.
fn fallback_variant(body: &str, sections: &[crate::structure::DetectedSection]) -> LyricVariant {
    let script = detect_script(body).unwrap_or(Script::Devanagari);
    let language = if script == Script::Devanagari { "sa" } else { "en" };
    LyricVariant {
        language: language.to_string(),
        script,
        sections: sections
            .iter()
            .map(|s| VariantSection {
                section_order: s.order,
                text: s.text.clone(),
            })
            .collect(),
    }
}

/// SHA-256 over page indices and texts, hex encoded.
fn page_texts_checksum(page_texts: &BTreeMap<usize, String>) -> String {
    let mut hasher = Sha256::new();
    for (page, text) in page_texts {
        hasher.update((*page as u64).to_le_bytes());
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::HeaderFields;
    use crate::layout::{BoundingBox, Page, TextSpan};
    use crate::structure::SectionKind;

    fn span(text: &str, page: usize, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text, page, BoundingBox::new(50.0, y, 400.0, y + size), size, "Times")
    }

    fn anthology() -> Document {
        let mut pages = Vec::new();
        for (i, title) in ["Akhilandesvari", "Kamakshi"].iter().enumerate() {
            let page = Page::new(600.0, 800.0)
                .with_span(span(title, i, 40.0, 18.0).bold())
                .with_span(span("Raga: Dvijavanti - Tala: Adi", i, 64.0, 12.0))
                .with_span(span("Pallavi", i, 100.0, 12.0))
                .with_span(span("akhilandesvari raksha mam", i, 116.0, 12.0))
                .with_span(span("Charanam", i, 140.0, 12.0))
                .with_span(span("siva sankari jagadambike", i, 156.0, 12.0))
                .with_span(span("Meaning", i, 180.0, 12.0))
                .with_span(span("prose commentary", i, 196.0, 12.0));
            pages.push(page);
        }
        Document::new(pages)
    }

    #[test]
    fn test_document_to_records() {
        let pipeline = ExtractionPipeline::default().with_source_id("guruguha");
        let records = pipeline.process_document(&anthology());
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title, "Akhilandesvari");
        assert_eq!(first.page_range.as_deref(), Some("1"));
        assert_eq!(first.primary_raga(), "Dvijavanti");
        assert_eq!(first.tala, "Adi");
        assert_eq!(first.source_id, "guruguha");
        assert_eq!(first.extraction_method, ExtractionMethod::PdfText);

        let kinds: Vec<SectionKind> = first.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(kinds, vec![SectionKind::Refrain, SectionKind::Verse]);
        assert_eq!(first.metadata_boundaries.len(), 1);

        // Latin lyrics form a single English variant.
        assert_eq!(first.lyric_variants.len(), 1);
        assert_eq!(first.lyric_variants[0].language, "en");
        assert!(first.alternate_title.is_none());
        for variant in &first.lyric_variants {
            for section in &variant.sections {
                assert!(!section.text.contains("prose"));
            }
        }
    }

    #[test]
    fn test_composer_hint_used_when_header_has_none() {
        let pipeline = ExtractionPipeline::default().with_composer_hint("Muthuswami Dikshitar");
        let records = pipeline.process_document(&anthology());
        assert!(records.iter().all(|r| r.composer == "Muthuswami Dikshitar"));
    }

    #[test]
    fn test_section_text_truncated() {
        let config = ExtractionConfig::default().with_max_section_bytes(10);
        let pipeline = ExtractionPipeline::new(config);
        let mut pages = BTreeMap::new();
        pages.insert(0, "Title\nPallavi\nakhilandesvari raksha mam".to_string());
        let records = pipeline.process_page_texts(&pages);
        let text = &records[0].lyric_variants[0].sections[0].text;
        assert!(text.len() <= 10);
        assert_eq!(text, "akhilandes");
    }

    #[test]
    fn test_ocr_page_texts() {
        let mut pages = BTreeMap::new();
        pages.insert(0, "अखिलाण्डेश्वरि\nपल्लवि\nअखिलाण्डेश्वरि रक्ष माम्".to_string());
        pages.insert(1, "   ".to_string());
        pages.insert(4, "Kamakshi\nPallavi\nkamakshi amba".to_string());

        let records = ExtractionPipeline::default().process_page_texts(&pages);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page_range.as_deref(), Some("1"));
        assert_eq!(records[1].page_range.as_deref(), Some("5"));
        assert!(records.iter().all(|r| r.extraction_method == ExtractionMethod::PdfOcr));

        let devanagari = &records[0];
        assert_eq!(devanagari.lyric_variants[0].script, Script::Devanagari);
        assert_eq!(devanagari.lyric_variants[0].language, "sa");
        assert!(devanagari.alternate_title.is_some());
        assert_eq!(records[0].checksum, records[1].checksum);
    }

    #[test]
    fn test_empty_body_yields_unknown_fields() {
        let segment = CompositionSegment {
            start_page: 2,
            end_page: 3,
            title_text: "Title Only".to_string(),
            body_text: String::new(),
            body_spans: Vec::new(),
        };
        let record = ExtractionPipeline::default().process_segment(&segment, "", ExtractionMethod::PdfText);
        assert_eq!(record.title, "Title Only");
        assert_eq!(record.tala, UNKNOWN);
        assert_eq!(record.composer, UNKNOWN);
        assert!(record.sections.is_empty());
        assert!(record.lyric_variants.is_empty());
        assert_eq!(record.page_range.as_deref(), Some("3-4"));
        assert!(record.checksum.is_none());
    }

    struct FixedFields;

    impl FieldExtractor for FixedFields {
        fn extract(&self, _header_text: &str, title_hint: Option<&str>) -> HeaderFields {
            HeaderFields {
                title: title_hint.unwrap_or("Fixed").to_string(),
                raga: Some("Todi".to_string()),
                ..HeaderFields::default()
            }
        }

        fn name(&self) -> &'static str {
            "FixedFields"
        }
    }

    #[test]
    fn test_custom_field_extractor() {
        let pipeline = ExtractionPipeline::default().with_field_extractor(Box::new(FixedFields));
        let records = pipeline.process_document(&anthology());
        assert!(records.iter().all(|r| r.primary_raga() == "Todi"));
    }
}
