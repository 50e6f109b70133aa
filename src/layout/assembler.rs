//! Span to line assembly.
//!
//! Spans arrive in reading order. Spans whose vertical centres (or bottom
//! edges) agree within a tolerance form one visual line; lines are joined
//! with newlines. Within a line a horizontal gap narrower than 15% of the
//! font size means the spans were split mid-word and are joined without a
//! space.
//!
//! Spans set in a recognised legacy font are concatenated raw and decoded as
//! one run, so glyph reordering and vowel fusion see across span edges.

use std::borrow::Cow;

use crate::fonts::{is_legacy_font, LegacyGlyphDecoder};
use crate::layout::text_block::TextSpan;

/// Fraction of the font size below which a gap does not produce a space.
pub const WORD_GAP_RATIO: f32 = 0.15;

/// Spans sharing one visual line, left to right.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// Member spans
    pub spans: Vec<&'a TextSpan>,
}

impl<'a> Line<'a> {
    fn anchor(&self) -> Option<&'a TextSpan> {
        self.spans.first().copied()
    }

    /// Top edge of the line.
    pub fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.bbox.y0)
            .fold(f32::INFINITY, f32::min)
    }
}

/// The visible text of a span, decoded when it is set in a legacy font.
pub fn visible_text(span: &TextSpan, decode_legacy: bool) -> Cow<'_, str> {
    if decode_legacy && is_legacy_font(&span.font_name) {
        Cow::Owned(LegacyGlyphDecoder::new().decode(&span.text))
    } else {
        Cow::Borrowed(span.text.as_str())
    }
}

/// Groups spans into lines and renders them as text.
#[derive(Debug, Clone, Copy)]
pub struct LineAssembler {
    tolerance: f32,
    decoder: Option<LegacyGlyphDecoder>,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl LineAssembler {
    /// Assembler with the given vertical tolerance in points; legacy decoding on.
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            decoder: Some(LegacyGlyphDecoder::new()),
        }
    }

    /// Enable or disable legacy font decoding.
    pub fn with_legacy_decoding(mut self, enable: bool) -> Self {
        self.decoder = enable.then(LegacyGlyphDecoder::new);
        self
    }

    /// Whether legacy font decoding is enabled.
    pub fn decodes_legacy(&self) -> bool {
        self.decoder.is_some()
    }

    fn same_line(&self, anchor: &TextSpan, span: &TextSpan) -> bool {
        anchor.page_index == span.page_index
            && ((anchor.bbox.center_y() - span.bbox.center_y()).abs() <= self.tolerance
                || (anchor.bbox.y1 - span.bbox.y1).abs() <= self.tolerance)
    }

    /// Group consecutive spans into visual lines.
    ///
    /// A page change always starts a new line. Spans within a line are
    /// ordered left to right.
    pub fn group_lines<'a, I>(&self, spans: I) -> Vec<Line<'a>>
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let mut lines: Vec<Line<'a>> = Vec::new();
        let mut current = Line { spans: Vec::new() };

        for span in spans {
            if span.is_blank() {
                continue;
            }
            match current.anchor() {
                Some(anchor) if !self.same_line(anchor, span) => {
                    lines.push(std::mem::replace(&mut current, Line { spans: vec![span] }));
                },
                _ => current.spans.push(span),
            }
        }
        if !current.spans.is_empty() {
            lines.push(current);
        }

        for line in &mut lines {
            line.spans.sort_by(|a, b| {
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        lines
    }

    fn needs_space(prev: &TextSpan, next: &TextSpan) -> bool {
        let gap = next.bbox.x0 - prev.bbox.x1;
        gap >= WORD_GAP_RATIO * prev.font_size.max(next.font_size)
    }

    /// Render one line.
    pub fn line_text(&self, line: &Line<'_>) -> String {
        let mut out = String::new();
        let mut raw_run = String::new();
        let mut prev: Option<&TextSpan> = None;

        for span in &line.spans {
            let spaced = prev.is_some_and(|p| Self::needs_space(p, span));
            let legacy = self.decoder.is_some() && is_legacy_font(&span.font_name);
            let text = if legacy { span.trimmed_text() } else { span.text.trim() };

            if legacy {
                if spaced {
                    if raw_run.is_empty() {
                        out.push(' ');
                    } else {
                        raw_run.push(' ');
                    }
                }
                raw_run.push_str(text);
            } else {
                self.flush_run(&mut raw_run, &mut out);
                if spaced {
                    out.push(' ');
                }
                out.push_str(text);
            }
            prev = Some(span);
        }
        self.flush_run(&mut raw_run, &mut out);

        out.trim().to_string()
    }

    fn flush_run(&self, raw_run: &mut String, out: &mut String) {
        if raw_run.is_empty() {
            return;
        }
        match &self.decoder {
            Some(decoder) => out.push_str(&decoder.decode(raw_run)),
            None => out.push_str(raw_run),
        }
        raw_run.clear();
    }

    /// Render spans as newline-separated lines.
    pub fn assemble<'a, I>(&self, spans: I) -> String
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        self.group_lines(spans)
            .iter()
            .map(|line| self.line_text(line))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Visible text of one span.
    pub fn span_text<'s>(&self, span: &'s TextSpan) -> Cow<'s, str> {
        visible_text(span, self.decoder.is_some())
    }
}
