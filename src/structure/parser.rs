//! Structure parser: sections, lyric variants and commentary boundaries.
//!
//! Parsing runs in three passes over one segment's body text:
//!
//! 1. Boundary scan. Every commentary label is located; the text before the
//!    earliest one is the lyric window and nothing after it reaches a section.
//! 2. Block building. The window is tokenised into lines and grouped into
//!    header-delimited blocks (see [`blocks`](super::blocks)).
//! 3. Assembly. Section blocks become canonical sections; language blocks,
//!    or per-line script detection when there are none, become lyric variants.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ParserConfig;
use crate::structure::blocks::{build_blocks, join_lines, tokenize, BlockLabel, LineToken, TextBlock};
use crate::structure::patterns::{detect_sub_marker, find_boundaries, HeaderTable, LanguageLabel};
use crate::structure::types::{
    DetectedSection, LyricVariant, MetadataBoundary, SectionKind, StructureParseResult,
    VariantSection,
};
use crate::text::{detect_script, Script};

/// Recovers the labelled structure of a composition from flat text.
///
/// # Example
///
/// ```
/// use kriti_oxide::structure::{SectionKind, StructureParser};
///
/// let parser = StructureParser::new();
/// let result = parser.parse("Pallavi\nakhila\n\nCharanam\nsiva\n\nMeaning\nprose");
///
/// assert_eq!(result.sections.len(), 2);
/// assert_eq!(result.sections[0].section_kind, SectionKind::Refrain);
/// assert_eq!(result.metadata_boundaries.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StructureParser {
    config: ParserConfig,
    headers: &'static HeaderTable,
}

impl Default for StructureParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureParser {
    /// Parser with the canonical header table and default settings.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            headers: HeaderTable::canonical(),
        }
    }

    /// Replace the parser settings.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse one segment's body text.
    ///
    /// Offsets in the result are character offsets into the text after
    /// escape expansion (identical to `text` when it holds no `\n` escapes).
    /// Empty or whitespace-only input yields an empty result.
    pub fn parse(&self, text: &str) -> StructureParseResult {
        if text.trim().is_empty() {
            return StructureParseResult::default();
        }

        let source = if self.config.expand_escaped_newlines {
            text.replace("\\n", "\n")
        } else {
            text.to_string()
        };

        let hits = find_boundaries(&source);
        let window_end = hits.first().map_or(source.len(), |h| h.start);
        let window = &source[..window_end];

        let tokens = tokenize(window);
        let blocks = build_blocks(&tokens, self.headers);

        let sections = extract_sections(&blocks, window);
        let has_language_headers = blocks
            .iter()
            .any(|b| matches!(b.label, BlockLabel::Language(_)));
        let lyric_variants = if has_language_headers {
            variants_from_language_blocks(&blocks, &sections)
        } else {
            variants_by_script(window, &sections)
        };

        let offsets = CharOffsets::new(&source);
        let sections = sections
            .into_iter()
            .map(|mut s| {
                s.start_offset = offsets.char_at(s.start_offset);
                s.end_offset = offsets.char_at(s.end_offset);
                s
            })
            .collect::<Vec<_>>();
        let metadata_boundaries = hits
            .iter()
            .map(|h| MetadataBoundary {
                label: h.label,
                start_offset: offsets.char_at(h.start),
                end_offset: offsets.char_at(h.end),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Parsed {} sections, {} variants, {} boundaries",
            sections.len(),
            lyric_variants.len(),
            metadata_boundaries.len()
        );

        StructureParseResult {
            sections,
            lyric_variants,
            metadata_boundaries,
        }
    }
}

/// Byte to char offset conversion over one string.
struct CharOffsets {
    /// Byte offset of every char start, plus the total length
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        starts.push(text.len());
        Self { starts }
    }

    /// Char offset of a byte offset; offsets inside a char round down.
    fn char_at(&self, byte: usize) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }
}

/// Running label state for canonical sections.
#[derive(Default)]
struct SectionLabeler {
    verses: u32,
}

impl SectionLabeler {
    fn label(&mut self, kind: SectionKind, sub_label: Option<&str>) -> String {
        let base = if kind == SectionKind::Verse {
            self.verses += 1;
            if self.verses == 1 {
                "Verse".to_string()
            } else {
                format!("Verse {}", self.verses)
            }
        } else {
            kind.display_name().to_string()
        };
        match sub_label {
            Some(sub) => format!("{} ({})", base, sub),
            None => base,
        }
    }
}

/// A verse-type block split at sub-section marker lines.
struct SubSection {
    label: Option<String>,
    lines: Vec<LineToken>,
}

/// Split a block at raga/viloma marker lines. `None` when no marker occurs.
fn split_sub_sections(block: &TextBlock) -> Option<Vec<SubSection>> {
    let mut parts: Vec<SubSection> = Vec::new();
    let mut current = SubSection {
        label: None,
        lines: Vec::new(),
    };
    let mut saw_marker = false;

    for line in &block.lines {
        match detect_sub_marker(&line.text) {
            Some(marker) => {
                saw_marker = true;
                if !current.lines.is_empty() {
                    parts.push(current);
                }
                current = SubSection {
                    label: Some(marker.label()),
                    lines: Vec::new(),
                };
            },
            None => current.lines.push(line.clone()),
        }
    }
    if !current.lines.is_empty() {
        parts.push(current);
    }

    saw_marker.then_some(parts)
}

fn section_from_lines(
    kind: SectionKind,
    order: u32,
    label: String,
    lines: &[LineToken],
) -> Option<DetectedSection> {
    let text = join_lines(lines);
    if text.is_empty() {
        return None;
    }
    let start = lines.first().map_or(0, |l| l.start);
    let end = lines.last().map_or(start, |l| l.end);
    Some(DetectedSection {
        section_kind: kind,
        order,
        label,
        text,
        start_offset: start,
        end_offset: end,
    })
}

/// Canonical sections, in byte offsets.
///
/// Sections come from section blocks only. The first language or commentary
/// block after a section ends the canonical pass; later variants are handled
/// separately.
fn extract_sections(blocks: &[TextBlock], window: &str) -> Vec<DetectedSection> {
    let mut sections: Vec<DetectedSection> = Vec::new();
    let mut labeler = SectionLabeler::default();
    let mut found_first = false;

    for block in blocks {
        let kind = match block.label {
            BlockLabel::Language(_) | BlockLabel::Commentary(_) => {
                if found_first {
                    break;
                }
                continue;
            },
            BlockLabel::Unlabeled => continue,
            BlockLabel::Section(kind) => kind,
        };
        found_first = true;

        let parts = if kind.is_verse_type() {
            split_sub_sections(block)
        } else {
            None
        };

        match parts {
            Some(parts) => {
                for part in parts {
                    let order = sections.len() as u32 + 1;
                    let label = labeler.label(kind, part.label.as_deref());
                    if let Some(section) = section_from_lines(kind, order, label, &part.lines) {
                        sections.push(section);
                    }
                }
            },
            None => {
                if block.text().is_empty() {
                    continue;
                }
                let order = sections.len() as u32 + 1;
                let label = labeler.label(kind, None);
                if let Some(section) = section_from_lines(kind, order, label, &block.lines) {
                    sections.push(section);
                }
            },
        }
    }

    if sections.is_empty() {
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            sections.push(DetectedSection {
                section_kind: SectionKind::Other,
                order: 1,
                label: SectionKind::Other.display_name().to_string(),
                text: trimmed.to_string(),
                start_offset: 0,
                end_offset: window.len(),
            });
        }
    }

    sections
}

/// Lyric variants from explicit language headers.
///
/// Each language header opens a variant; section blocks that follow belong
/// to it until the next language header. A commentary block ends the scan.
fn variants_from_language_blocks(
    blocks: &[TextBlock],
    canonical: &[DetectedSection],
) -> Vec<LyricVariant> {
    let mut grouped: Vec<(LanguageLabel, Vec<&TextBlock>)> = Vec::new();

    for block in blocks {
        match block.label {
            BlockLabel::Commentary(_) => break,
            BlockLabel::Language(language) => grouped.push((language, vec![block])),
            _ => {
                if let Some((_, members)) = grouped.last_mut() {
                    members.push(block);
                }
            },
        }
    }

    grouped
        .into_iter()
        .filter_map(|(language, members)| {
            let (code, script) = language.language_and_script();
            let variant = LyricVariant {
                language: code.to_string(),
                script,
                sections: align_to_canonical(&members, canonical),
            };
            (!variant.is_empty()).then_some(variant)
        })
        .collect()
}

/// Map a variant's blocks onto canonical section orders.
///
/// A block takes the first unused canonical order of the same kind, else the
/// first unused order of any kind. When every order is used, its text is
/// appended to the previous variant section.
fn align_to_canonical(blocks: &[&TextBlock], canonical: &[DetectedSection]) -> Vec<VariantSection> {
    let mut used: BTreeSet<u32> = BTreeSet::new();
    let mut out: Vec<VariantSection> = Vec::new();

    for block in blocks {
        let text = block.text();
        if text.is_empty() {
            continue;
        }
        let kind = block.label.section_kind().unwrap_or(SectionKind::Other);

        let order = canonical
            .iter()
            .find(|s| s.section_kind == kind && !used.contains(&s.order))
            .or_else(|| canonical.iter().find(|s| !used.contains(&s.order)))
            .map(|s| s.order);

        match order {
            Some(order) => {
                used.insert(order);
                out.push(VariantSection {
                    section_order: order,
                    text,
                });
            },
            None => {
                if let Some(last) = out.last_mut() {
                    last.text.push('\n');
                    last.text.push_str(&text);
                }
            },
        }
    }

    out.sort_by_key(|s| s.section_order);
    out
}

/// Lyric variants from per-line script detection.
///
/// Each line of each canonical section is assigned to its majority script;
/// one variant is produced per script, ordered by script code.
fn variants_by_script(window: &str, canonical: &[DetectedSection]) -> Vec<LyricVariant> {
    if canonical.is_empty() {
        return Vec::new();
    }

    let mut by_script: BTreeMap<Script, BTreeMap<u32, Vec<&str>>> = BTreeMap::new();
    for section in canonical {
        for line in section.text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(script) = detect_script(line) {
                by_script
                    .entry(script)
                    .or_default()
                    .entry(section.order)
                    .or_default()
                    .push(line);
            }
        }
    }

    if by_script.is_empty() {
        let script = detect_script(window).unwrap_or(Script::Latin);
        let variant = LyricVariant {
            language: script.default_language().to_string(),
            script,
            sections: canonical
                .iter()
                .filter(|s| !s.text.trim().is_empty())
                .map(|s| VariantSection {
                    section_order: s.order,
                    text: s.text.clone(),
                })
                .collect(),
        };
        return if variant.is_empty() { Vec::new() } else { vec![variant] };
    }

    by_script
        .into_iter()
        .map(|(script, orders)| LyricVariant {
            language: script.default_language().to_string(),
            script,
            sections: orders
                .into_iter()
                .map(|(order, lines)| VariantSection {
                    section_order: order,
                    text: lines.join("\n"),
                })
                .collect(),
        })
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::types::BoundaryLabel;

    fn parse(text: &str) -> StructureParseResult {
        StructureParser::new().parse(text)
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\t ").is_empty());
    }

    #[test]
    fn test_sections_and_boundary() {
        let result = parse(
            "Pallavi\nakhilandesvari raksha mam\n\nCharanam\nsiva sankari jagadambike\n\nMeaning\nprose commentary",
        );
        assert_eq!(result.sections.len(), 2);
        assert_eq!(result.sections[0].section_kind, SectionKind::Refrain);
        assert_eq!(result.sections[1].section_kind, SectionKind::Verse);
        assert_eq!(result.sections[1].label, "Verse");
        assert_eq!(result.metadata_boundaries.len(), 1);
        assert_eq!(result.metadata_boundaries[0].label, BoundaryLabel::Meaning);
        assert!(result.sections.iter().all(|s| !s.text.contains("prose")));
    }

    #[test]
    fn test_orders_are_dense() {
        let result = parse("Pallavi\na\nAnupallavi\nb\nCharanam\nc\nCharanam 2\nd");
        let orders: Vec<u32> = result.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert_eq!(result.sections[3].label, "Verse 2");
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let text = "पल्लवि\nअखिल\nचरणम्\nशिव";
        let result = parse(text);
        assert_eq!(result.sections.len(), 2);
        let chars: Vec<char> = text.chars().collect();
        let s = &result.sections[1];
        let slice: String = chars[s.start_offset..s.end_offset].iter().collect();
        assert_eq!(slice, "शिव");
    }

    #[test]
    fn test_no_headers_gives_other_section() {
        let result = parse("just some lyric\nwith two lines");
        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].section_kind, SectionKind::Other);
        assert_eq!(result.sections[0].label, "Other");
        assert_eq!(result.lyric_variants.len(), 1);
        assert_eq!(result.lyric_variants[0].script, Script::Latin);
    }

    #[test]
    fn test_escaped_newlines_expanded() {
        let result = parse("Pallavi\\nakhila\\nCharanam\\nsiva");
        assert_eq!(result.sections.len(), 2);
    }

    #[test]
    fn test_escaped_newlines_kept_when_disabled() {
        let parser = StructureParser::new().with_config(ParserConfig {
            expand_escaped_newlines: false,
        });
        let result = parser.parse("Pallavi\\nakhila");
        assert_eq!(result.sections.len(), 1);
        assert!(result.sections[0].text.contains("\\n"));
    }

    #[test]
    fn test_ragamalika_sub_sections() {
        let result = parse("Pallavi\nsri\nCharanam\nSri ragam\nline one\nMohana ragam\nline two");
        let labels: Vec<&str> = result.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Refrain", "Verse (Sri)", "Verse 2 (Mohana)"]);
        assert_eq!(result.sections[2].text, "line two");
    }

    #[test]
    fn test_language_header_variants() {
        let result = parse(
            "Devanagari\nपल्लवि\nअखिल\nचरणम्\nशिव\nEnglish\nPallavi\nakhila\nCharanam\nsiva",
        );
        assert_eq!(result.lyric_variants.len(), 2);
        assert_eq!(result.lyric_variants[0].language, "sa");
        assert_eq!(result.lyric_variants[0].script, Script::Devanagari);
        assert_eq!(result.lyric_variants[1].language, "en");
        assert_eq!(result.lyric_variants[1].sections.len(), 2);
        assert_eq!(result.lyric_variants[1].sections[1].text, "siva");
    }

    #[test]
    fn test_script_split_variants() {
        let result = parse("Pallavi\nअखिल\nakhila\nCharanam\nशिव\nsiva");
        assert_eq!(result.lyric_variants.len(), 2);
        assert_eq!(result.lyric_variants[0].script, Script::Devanagari);
        assert_eq!(result.lyric_variants[0].sections[0].text, "अखिल");
        assert_eq!(result.lyric_variants[1].script, Script::Latin);
        assert_eq!(result.lyric_variants[1].sections[1].text, "siva");
    }

    #[test]
    fn test_variant_overflow_appends_to_previous() {
        let blocks = build_blocks(&tokenize("Pallavi\na\nCharanam\nb\nCharanam\nc"), HeaderTable::canonical());
        let canonical = vec![DetectedSection {
            section_kind: SectionKind::Refrain,
            order: 1,
            label: "Refrain".to_string(),
            text: "a".to_string(),
            start_offset: 0,
            end_offset: 1,
        }];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let aligned = align_to_canonical(&refs, &canonical);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].text, "a\nb\nc");
    }

    #[test]
    fn test_char_offsets_round_down() {
        let offsets = CharOffsets::new("aअb");
        assert_eq!(offsets.char_at(0), 0);
        assert_eq!(offsets.char_at(1), 1);
        assert_eq!(offsets.char_at(2), 1);
        assert_eq!(offsets.char_at(4), 2);
        assert_eq!(offsets.char_at(5), 3);
    }
}
