//! Line tokenizer and header-driven block builder.
//!
//! The builder is a single-pass scanner with two states: outside any labelled
//! block, or inside a block opened by a header line. A header flushes the
//! current block and opens a new one; other lines accumulate into the open
//! block. The terminal state flushes the last block.
//!
//! Offsets here are byte offsets into the scanned text.

use crate::structure::patterns::{
    detect_language_header, is_boilerplate, strip_subscript_digits, HeaderTable, HeaderTarget,
    LanguageLabel,
};
use crate::structure::types::{BoundaryLabel, SectionKind};

/// A non-blank, cleaned line with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineToken {
    /// Cleaned line text
    pub text: String,
    /// Byte offset of the first non-blank character
    pub start: usize,
    /// Byte offset just past the last non-blank character
    pub end: usize,
}

/// What opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLabel {
    /// Lines before any header
    Unlabeled,
    /// A section header
    Section(SectionKind),
    /// A language/script header
    Language(LanguageLabel),
    /// A commentary header that slipped past the boundary scan
    Commentary(BoundaryLabel),
}

impl BlockLabel {
    /// Section kind for section blocks.
    pub fn section_kind(&self) -> Option<SectionKind> {
        match self {
            BlockLabel::Section(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Language and commentary blocks are kept even when they have no lines.
    fn kept_when_empty(&self) -> bool {
        matches!(self, BlockLabel::Language(_) | BlockLabel::Commentary(_))
    }
}

/// Consecutive lines under one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// What opened the block
    pub label: BlockLabel,
    /// Lines in the block, header remainder first
    pub lines: Vec<LineToken>,
    /// Byte offset where the block starts
    pub start: usize,
    /// Byte offset where the block ends
    pub end: usize,
}

impl TextBlock {
    /// Block lines joined with newlines.
    pub fn text(&self) -> String {
        join_lines(&self.lines)
    }
}

/// Join token texts with newlines, trimmed.
pub fn join_lines(lines: &[LineToken]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Split text into cleaned, non-blank, non-boilerplate lines.
pub fn tokenize(text: &str) -> Vec<LineToken> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        let start = line_start + (line.len() - line.trim_start().len());
        let end = start + stripped.len();

        let cleaned = strip_subscript_digits(stripped);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || is_boilerplate(cleaned) {
            continue;
        }
        tokens.push(LineToken {
            text: cleaned.to_string(),
            start,
            end,
        });
    }

    tokens
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside(BlockLabel),
}

impl ScanState {
    fn label(&self) -> BlockLabel {
        match self {
            ScanState::Outside => BlockLabel::Unlabeled,
            ScanState::Inside(label) => *label,
        }
    }
}

struct BlockBuilder {
    state: ScanState,
    header_start: usize,
    lines: Vec<LineToken>,
    blocks: Vec<TextBlock>,
}

impl BlockBuilder {
    fn new(first_start: usize) -> Self {
        Self {
            state: ScanState::Outside,
            header_start: first_start,
            lines: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let label = self.state.label();
        if self.lines.is_empty() && !label.kept_when_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.lines);
        let start = lines.first().map_or(self.header_start, |l| l.start);
        let end = lines.last().map_or(self.header_start, |l| l.end);
        self.blocks.push(TextBlock {
            label,
            lines,
            start,
            end,
        });
    }

    fn open(&mut self, label: BlockLabel, token: &LineToken, remainder: String) {
        self.flush();
        self.state = ScanState::Inside(label);
        self.header_start = token.start;
        if !remainder.is_empty() {
            self.lines.push(LineToken {
                text: remainder,
                start: token.start,
                end: token.end,
            });
        }
    }

    fn push(&mut self, token: &LineToken) {
        self.lines.push(token.clone());
    }

    fn finish(mut self) -> Vec<TextBlock> {
        self.flush();
        self.blocks
    }
}

/// Classify a line as a header, language headers first.
pub fn detect_header(line: &str, table: &HeaderTable) -> Option<(BlockLabel, String)> {
    if let Some((language, remainder)) = detect_language_header(line) {
        return Some((BlockLabel::Language(language), remainder));
    }
    table.detect(line).map(|m| {
        let label = match m.target {
            HeaderTarget::Section(kind) => BlockLabel::Section(kind),
            HeaderTarget::Commentary(label) => BlockLabel::Commentary(label),
        };
        (label, m.remainder)
    })
}

/// Group tokens into header-delimited blocks.
///
/// A leading unlabelled block is dropped when a language header appears
/// later: its text then belongs to no variant.
pub fn build_blocks(tokens: &[LineToken], table: &HeaderTable) -> Vec<TextBlock> {
    let Some(first) = tokens.first() else {
        return Vec::new();
    };

    let mut builder = BlockBuilder::new(first.start);
    for token in tokens {
        match detect_header(&token.text, table) {
            Some((label, remainder)) => builder.open(label, token, remainder),
            None => builder.push(token),
        }
    }
    let mut blocks = builder.finish();

    let has_language = blocks.iter().any(|b| matches!(b.label, BlockLabel::Language(_)));
    if has_language && blocks.first().is_some_and(|b| b.label == BlockLabel::Unlabeled) {
        blocks.remove(0);
    }

    log::debug!("Built {} blocks from {} lines", blocks.len(), tokens.len());
    blocks
}
