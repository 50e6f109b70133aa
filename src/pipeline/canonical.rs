//! The canonical extraction record handed to downstream collaborators.
//!
//! Field names serialize in camelCase and `None` fields are omitted; enum
//! values serialize in SCREAMING_SNAKE_CASE. These keys are the stable wire
//! contract with resolution and persistence services.

use serde::{Deserialize, Serialize};

use crate::structure::{
    BoundaryLabel, DetectedSection, LyricVariant, MetadataBoundary, SectionKind,
};
use crate::text::Script;

/// Placeholder for fields that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// How the text behind a record was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionMethod {
    /// Text layer of a born-digital document
    PdfText,
    /// Page texts from the OCR collaborator
    PdfOcr,
}

/// A raga reference; ragamalika compositions carry several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRaga {
    /// Raga name as extracted
    pub name: String,
    /// 1 for the primary raga
    pub order: u32,
}

/// A section of the canonical skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSection {
    /// Structural role
    #[serde(rename = "type")]
    pub section_type: SectionKind,
    /// 1-based order
    pub order: u32,
    /// Human label
    pub label: String,
}

impl From<&DetectedSection> for CanonicalSection {
    fn from(section: &DetectedSection) -> Self {
        Self {
            section_type: section.section_kind,
            order: section.order,
            label: section.label.clone(),
        }
    }
}

/// Lyric text for one canonical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalLyricSection {
    /// Matches [`CanonicalSection::order`]
    pub section_order: u32,
    /// Lyric text
    pub text: String,
}

/// Lyrics in one language and script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalLyricVariant {
    /// Language code
    pub language: String,
    /// Script
    pub script: Script,
    /// Sections aligned to the canonical skeleton
    pub sections: Vec<CanonicalLyricSection>,
}

impl CanonicalLyricVariant {
    /// Convert a parsed variant, truncating section texts to `max_bytes`.
    ///
    /// Empty sections are dropped; `None` when nothing remains.
    pub fn from_variant(variant: &LyricVariant, max_bytes: usize) -> Option<Self> {
        let sections: Vec<CanonicalLyricSection> = variant
            .sections
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| CanonicalLyricSection {
                section_order: s.section_order,
                text: truncate_utf8(&s.text, max_bytes),
            })
            .filter(|s| !s.text.is_empty())
            .collect();
        if sections.is_empty() {
            return None;
        }
        Some(Self {
            language: variant.language.clone(),
            script: variant.script,
            sections,
        })
    }
}

/// Where commentary begins in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMetadataBoundary {
    /// Commentary kind
    pub label: BoundaryLabel,
    /// Start offset (chars)
    pub start_offset: usize,
    /// End offset (chars)
    pub end_offset: usize,
}

impl From<&MetadataBoundary> for CanonicalMetadataBoundary {
    fn from(boundary: &MetadataBoundary) -> Self {
        Self {
            label: boundary.label,
            start_offset: boundary.start_offset,
            end_offset: boundary.end_offset,
        }
    }
}

/// One composition, fully structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalExtraction {
    /// Composition title
    pub title: String,
    /// Transliterated title
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alternate_title: Option<String>,
    /// Composer, or "Unknown"
    pub composer: String,
    /// Ragas in order, "Unknown" when none was found
    pub ragas: Vec<CanonicalRaga>,
    /// Tala, or "Unknown"
    pub tala: String,
    /// Canonical section skeleton
    pub sections: Vec<CanonicalSection>,
    /// Lyric variants
    pub lyric_variants: Vec<CanonicalLyricVariant>,
    /// Commentary boundaries
    pub metadata_boundaries: Vec<CanonicalMetadataBoundary>,
    /// Deity
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deity: Option<String>,
    /// Temple or kshetra
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temple: Option<String>,
    /// Source document identifier
    pub source_id: String,
    /// How the text was obtained
    pub extraction_method: ExtractionMethod,
    /// RFC 3339 timestamp of the extraction
    pub extraction_timestamp: String,
    /// 1-based page range, e.g. "42-43"
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_range: Option<String>,
    /// SHA-256 of the source content
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub checksum: Option<String>,
}

/// Field values proposed by an enrichment collaborator.
///
/// Only fields that are absent or "Unknown" on the record are filled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    /// Title
    pub title: Option<String>,
    /// Alternate title
    pub alternate_title: Option<String>,
    /// Composer
    pub composer: Option<String>,
    /// Primary raga
    pub raga: Option<String>,
    /// Tala
    pub tala: Option<String>,
    /// Deity
    pub deity: Option<String>,
    /// Temple
    pub temple: Option<String>,
}

fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case(UNKNOWN)
}

fn usable(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_missing(v))
}

fn fill_required(slot: &mut String, value: Option<String>) -> bool {
    match usable(value) {
        Some(v) if is_missing(slot) => {
            *slot = v;
            true
        },
        _ => false,
    }
}

fn fill_optional(slot: &mut Option<String>, value: Option<String>) -> bool {
    match usable(value) {
        Some(v) if slot.as_deref().map_or(true, is_missing) => {
            *slot = Some(v);
            true
        },
        _ => false,
    }
}

impl CanonicalExtraction {
    /// Primary raga name.
    pub fn primary_raga(&self) -> &str {
        self.ragas.first().map_or(UNKNOWN, |r| r.name.as_str())
    }

    /// Merge enrichment results into missing fields.
    ///
    /// Sections, lyric variants and boundaries are never touched. Returns
    /// the wire names of the fields that changed.
    pub fn apply_enrichment(&mut self, patch: FieldPatch) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if fill_required(&mut self.title, patch.title) {
            changed.push("title");
        }
        if fill_optional(&mut self.alternate_title, patch.alternate_title) {
            changed.push("alternateTitle");
        }
        if fill_required(&mut self.composer, patch.composer) {
            changed.push("composer");
        }
        if let Some(raga) = usable(patch.raga) {
            if is_missing(self.primary_raga()) {
                let primary = CanonicalRaga { name: raga, order: 1 };
                match self.ragas.first_mut() {
                    Some(first) => *first = primary,
                    None => self.ragas.push(primary),
                }
                changed.push("ragas");
            }
        }
        if fill_required(&mut self.tala, patch.tala) {
            changed.push("tala");
        }
        if fill_optional(&mut self.deity, patch.deity) {
            changed.push("deity");
        }
        if fill_optional(&mut self.temple, patch.temple) {
            changed.push("temple");
        }

        if !changed.is_empty() {
            log::debug!("Enrichment filled {:?} for {:?}", changed, self.title);
        }
        changed
    }
}

/// Trim text to at most `max_bytes` bytes of UTF-8, on a char boundary.
///
/// Trailing whitespace left by the cut is removed.
pub fn truncate_utf8(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CanonicalExtraction {
        CanonicalExtraction {
            title: "Akhilandesvari".to_string(),
            alternate_title: None,
            composer: UNKNOWN.to_string(),
            ragas: vec![CanonicalRaga {
                name: UNKNOWN.to_string(),
                order: 1,
            }],
            tala: "Adi".to_string(),
            sections: vec![CanonicalSection {
                section_type: SectionKind::Refrain,
                order: 1,
                label: "Refrain".to_string(),
            }],
            lyric_variants: Vec::new(),
            metadata_boundaries: vec![CanonicalMetadataBoundary {
                label: BoundaryLabel::Meaning,
                start_offset: 10,
                end_offset: 17,
            }],
            deity: None,
            temple: None,
            source_id: "mdskt".to_string(),
            extraction_method: ExtractionMethod::PdfText,
            extraction_timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            page_range: Some("5-7".to_string()),
            checksum: None,
        }
    }

    #[test]
    fn test_wire_keys_are_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["pageRange"], "5-7");
        assert_eq!(json["extractionMethod"], "PDF_TEXT");
        assert_eq!(json["sections"][0]["type"], "REFRAIN");
        assert_eq!(json["metadataBoundaries"][0]["label"], "MEANING");
        assert_eq!(json["metadataBoundaries"][0]["startOffset"], 10);
        assert!(json.get("alternateTitle").is_none());
        assert!(json.get("checksum").is_none());
    }

    #[test]
    fn test_enrichment_fills_only_missing() {
        let mut rec = record();
        let changed = rec.apply_enrichment(FieldPatch {
            title: Some("Other Title".to_string()),
            composer: Some("Muthuswami Dikshitar".to_string()),
            raga: Some("Dvijavanti".to_string()),
            tala: Some("Rupakam".to_string()),
            deity: Some("Kamakshi".to_string()),
            ..FieldPatch::default()
        });
        assert_eq!(changed, vec!["composer", "ragas", "deity"]);
        assert_eq!(rec.title, "Akhilandesvari");
        assert_eq!(rec.tala, "Adi");
        assert_eq!(rec.primary_raga(), "Dvijavanti");
        assert_eq!(rec.sections.len(), 1);
    }

    #[test]
    fn test_enrichment_ignores_unknown_values() {
        let mut rec = record();
        let changed = rec.apply_enrichment(FieldPatch {
            composer: Some("unknown".to_string()),
            ..FieldPatch::default()
        });
        assert!(changed.is_empty());
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_utf8("short", 100), "short");
        // Each Devanagari letter is 3 bytes.
        assert_eq!(truncate_utf8("रागम", 7), "रा");
        assert_eq!(truncate_utf8("ab cd", 3), "ab");
    }

    #[test]
    fn test_variant_conversion_drops_empty_sections() {
        let variant = LyricVariant {
            language: "en".to_string(),
            script: Script::Latin,
            sections: vec![
                crate::structure::VariantSection {
                    section_order: 1,
                    text: "akhila".to_string(),
                },
                crate::structure::VariantSection {
                    section_order: 2,
                    text: " ".to_string(),
                },
            ],
        };
        let canonical = CanonicalLyricVariant::from_variant(&variant, 1800).unwrap();
        assert_eq!(canonical.sections.len(), 1);
        assert_eq!(serde_json::to_value(&canonical).unwrap()["sections"][0]["sectionOrder"], 1);
    }
}
