//! Header field extraction: title, raga, tala, composer, deity, temple.
//!
//! Composition headers come in several encodings of the same labels:
//!
//! 1. Plain ASCII: `raga`, `raaga`
//! 2. IAST: `rāga`, `rāgaṁ`
//! 3. Macron-split: `r¯aga ˙m`, `t¯al.a ˙m`
//! 4. Devanagari: `राग`, `ताल`
//!
//! The header text is matched after normalisation first and raw second, so
//! both repaired and untouched label forms are found.

use lazy_static::lazy_static;
use regex::Regex;

use crate::text::{cleanup_raga_tala_name, normalize};

/// Raga label in all four encodings
const RAGA_LABEL: &str =
    r"(?:r[\u{00AF}\u{0101}]?a+ga\s*[\u{02D9}.]?\s*[\u{1E41}\u{1E43}m]?|r\u{0101}ga[\u{1E41}\u{1E43}m]?|राग)";

/// Tala label in all four encodings
const TALA_LABEL: &str = r"(?:t[\u{00AF}\u{0101}]?a+l[.\u{1E37}]?\s*a\s*[\u{02D9}.]?\s*[\u{1E41}\u{1E43}m]?|t\u{0101}[l\u{1E37}]{1,2}a[\u{1E41}\u{1E43}m]?|ताल)";

lazy_static! {
    /// "Raga: X — Tala: Y" on one line
    static ref RE_RAGA_TALA_COMBINED: Regex = Regex::new(&format!(
        r"(?im){raga}\s*[:—–\-]\s*(.+?)(?:\s*\(\d+\)\s*)?\s*[—–\-|]\s*{tala}\s*[:—–\-]\s*(.+?)(?:\s*\(\d+\))?$",
        raga = RAGA_LABEL,
        tala = TALA_LABEL
    ))
    .unwrap();

    /// "Raga: X" ending at a tala label or end of line
    static ref RE_RAGA: Regex = Regex::new(&format!(
        r"(?im){raga}\s*[:—–\-]\s*(.+?)(?:\s*\(\d+\)\s*)?(?:\s*[—–\-|]\s*{tala}|$)",
        raga = RAGA_LABEL,
        tala = TALA_LABEL
    ))
    .unwrap();

    /// "Tala: Y"
    static ref RE_TALA: Regex = Regex::new(&format!(
        r"(?im){tala}\s*[:—–\-]\s*(.+?)(?:\s*\(\d+\))?(?:\s*$|\s*[—–\-|])",
        tala = TALA_LABEL
    ))
    .unwrap();

    /// Unlabelled "Kalyani - Adi"
    static ref RE_RAGA_TALA_SIMPLE: Regex = Regex::new(
        r"(?m)^([A-Z][a-zāīūṛṣṇḍṭḥ]+(?:\s[A-Z][a-zāīūṛṣṇḍṭḥ]+)*)\s*[—–\-]\s*([A-Z][a-zāīūṛṣṇḍṭḥ]+(?:\s[A-Z][a-zāīūṛṣṇḍṭḥ]+)*)$"
    )
    .unwrap();

    static ref RE_DEITY: Regex = Regex::new(
        r"(?im)(?:deity|devatā|देवता)\s*[:—–\-]\s*(.+?)(?:\s+(?:at|temple|kshetra)\b|\s*क्षेत्र|$)"
    )
    .unwrap();

    static ref RE_TEMPLE: Regex = Regex::new(
        r"(?im)(?:temple|kshetra|sthala|क्षेत्र|स्थल)\s*[:—–\-]\s*(.+?)$"
    )
    .unwrap();

    static ref RE_COMPOSER: Regex = Regex::new(
        r"(?im)(?:composer|vāggeyakāra|वाग्गेयकार)\s*[:—–\-]\s*(.+?)$"
    )
    .unwrap();
}

/// Labelled fields recovered from a composition header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderFields {
    /// Composition title
    pub title: String,
    /// Raga name, cleaned
    pub raga: Option<String>,
    /// Tala name, cleaned
    pub tala: Option<String>,
    /// Composer as printed
    pub composer: Option<String>,
    /// Deity as printed
    pub deity: Option<String>,
    /// Temple or kshetra as printed
    pub temple: Option<String>,
}

/// Metadata field extraction collaborator.
///
/// Implementations receive the first few hundred characters of a segment and
/// an optional title found by layout analysis. Extraction is best effort:
/// unmatched fields are `None`.
pub trait FieldExtractor: Send + Sync {
    /// Extract header fields.
    fn extract(&self, header_text: &str, title_hint: Option<&str>) -> HeaderFields;

    /// Extractor name for logs.
    fn name(&self) -> &'static str;
}

/// Regex extractor for the label formats printed in anthology headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFieldExtractor;

impl HeaderFieldExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }

    fn raga_tala(text: &str) -> (Option<String>, Option<String>) {
        if let Some(caps) = RE_RAGA_TALA_COMBINED.captures(text) {
            return (group(&caps, 1), group(&caps, 2));
        }

        let raga = capture(&RE_RAGA, text);
        let tala = capture(&RE_TALA, text);
        if raga.is_none() && tala.is_none() {
            if let Some(caps) = RE_RAGA_TALA_SIMPLE.captures(text) {
                return (group(&caps, 1), group(&caps, 2));
            }
        }
        (raga, tala)
    }
}

fn group(caps: &regex::Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).and_then(|caps| group(&caps, 1))
}

impl FieldExtractor for HeaderFieldExtractor {
    /// Without a title hint the first line is the title and is excluded from
    /// field matching; with a hint every line is searched.
    fn extract(&self, header_text: &str, title_hint: Option<&str>) -> HeaderFields {
        let lines: Vec<&str> = header_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let hint = title_hint.map(str::trim).filter(|t| !t.is_empty());
        let (raw_title, field_lines) = match (hint, lines.split_first()) {
            (Some(hint), _) => (hint, &lines[..]),
            (None, Some((first, rest))) => (*first, rest),
            (None, None) => ("Unknown", &lines[..]),
        };

        let raw_text = field_lines.join("\n");
        let normalized = normalize(&raw_text);

        let (mut raga, mut tala) = Self::raga_tala(&normalized);
        if raga.is_none() && tala.is_none() {
            (raga, tala) = Self::raga_tala(&raw_text);
        }

        HeaderFields {
            title: normalize(raw_title).trim().to_string(),
            raga: raga.map(|r| cleanup_raga_tala_name(&r)).filter(|r| !r.is_empty()),
            tala: tala.map(|t| cleanup_raga_tala_name(&t)).filter(|t| !t.is_empty()),
            composer: capture(&RE_COMPOSER, &raw_text),
            deity: capture(&RE_DEITY, &raw_text),
            temple: capture(&RE_TEMPLE, &raw_text),
        }
    }

    fn name(&self) -> &'static str {
        "HeaderFieldExtractor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str, hint: Option<&str>) -> HeaderFields {
        HeaderFieldExtractor::new().extract(text, hint)
    }

    #[test]
    fn test_combined_line() {
        let fields = extract("Akhilandesvari\nRaga: Dvijavanti — Tala: Adi", None);
        assert_eq!(fields.title, "Akhilandesvari");
        assert_eq!(fields.raga.as_deref(), Some("Dvijavanti"));
        assert_eq!(fields.tala.as_deref(), Some("Adi"));
    }

    #[test]
    fn test_separate_lines_with_mela_number() {
        let fields = extract("Title\nraga: kalyani (65)\ntala: rupakam", None);
        assert_eq!(fields.raga.as_deref(), Some("Kalyani"));
        assert_eq!(fields.tala.as_deref(), Some("Rupakam"));
    }

    #[test]
    fn test_macron_split_labels() {
        let fields = extract("Title\nr\u{00AF}aga \u{02D9}m: jujavanti (28)\nt\u{00AF}al.a \u{02D9}m: \u{00AF}adi", None);
        assert_eq!(fields.raga.as_deref(), Some("Jujavanti"));
        assert_eq!(fields.tala.as_deref(), Some("Ādi"));
    }

    #[test]
    fn test_devanagari_labels() {
        let fields = extract("शीर्षक\nराग: कल्याणी\nताल: आदि", None);
        assert_eq!(fields.raga.as_deref(), Some("कल्याणी"));
        assert_eq!(fields.tala.as_deref(), Some("आदि"));
    }

    #[test]
    fn test_simple_unlabelled_format() {
        let fields = extract("Title\nKalyani - Adi", None);
        assert_eq!(fields.raga.as_deref(), Some("Kalyani"));
        assert_eq!(fields.tala.as_deref(), Some("Adi"));
    }

    #[test]
    fn test_deity_temple_composer() {
        let fields = extract(
            "Title\nDeity: Kamakshi at Kanchipuram\nTemple: Kanchipuram\nComposer: Dikshitar",
            None,
        );
        assert_eq!(fields.deity.as_deref(), Some("Kamakshi"));
        assert_eq!(fields.temple.as_deref(), Some("Kanchipuram"));
        assert_eq!(fields.composer.as_deref(), Some("Dikshitar"));
    }

    #[test]
    fn test_title_hint_keeps_first_line_searchable() {
        let fields = extract("Raga: Todi\nsome lyric", Some("Kamakshi"));
        assert_eq!(fields.title, "Kamakshi");
        assert_eq!(fields.raga.as_deref(), Some("Todi"));
    }

    #[test]
    fn test_no_fields() {
        let fields = extract("", None);
        assert_eq!(fields.title, "Unknown");
        assert!(fields.raga.is_none());
        assert!(fields.tala.is_none());
    }
}
