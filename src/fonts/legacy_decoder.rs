//! Legacy Devanagari glyph decoding.
//!
//! Text extracted from spans set in a Velthuis Devanagari font is a sequence of
//! glyph codes in visual order. Decoding runs three passes:
//!
//! 1. Substitute each code through [`legacy_glyphs`](super::legacy_glyphs).
//! 2. Move left-side vowel signs behind the consonant cluster they attach to.
//! 3. Fuse an independent vowel with its own following vowel sign.
//!
//! Decoding is total: unknown codes pass through unchanged.

use super::legacy_glyphs::{self, LEFT_SIDE_MATRAS, VIRAMA, VOWEL_FUSIONS};

/// Decoder for the Velthuis Devanagari glyph encoding.
///
/// Stateless; the glyph table it reads is a shared read-only static, so one
/// decoder can be used from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyGlyphDecoder;

impl LegacyGlyphDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Whether spans set in `font_name` should be decoded.
    pub fn handles_font(&self, font_name: &str) -> bool {
        legacy_glyphs::is_legacy_font(font_name)
    }

    /// Decode raw glyph codes to logical-order Unicode Devanagari.
    ///
    /// # Arguments
    ///
    /// * `raw` - Text exactly as extracted from a legacy-font span
    ///
    /// # Returns
    ///
    /// Unicode Devanagari. Codes outside the table are copied verbatim.
    pub fn decode(&self, raw: &str) -> String {
        let substituted = substitute_glyphs(raw);
        let reordered = reorder_left_matras(substituted);
        fuse_vowels(reordered.into_iter().collect())
    }
}

/// Pass 1: glyph substitution.
fn substitute_glyphs(raw: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(raw.len() * 2);
    for ch in raw.chars() {
        match legacy_glyphs::lookup(ch as u32) {
            Some(mapped) => out.extend(mapped.chars()),
            None => out.push(ch),
        }
    }
    out
}

/// Pass 2: visual-to-logical reordering of left-side vowel signs.
///
/// From each left-side sign, skip consonant+virāma pairs until a bare
/// consonant closes the cluster, then move the sign behind it. A sign with no
/// following consonant stays put.
fn reorder_left_matras(mut chars: Vec<char>) -> Vec<char> {
    let mut i = 0;
    while i < chars.len() {
        if !LEFT_SIDE_MATRAS.contains(&chars[i]) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let mut terminal = None;
        while j < chars.len() && legacy_glyphs::is_consonant(chars[j]) {
            if chars.get(j + 1) == Some(&VIRAMA) {
                j += 2;
            } else {
                terminal = Some(j);
                break;
            }
        }

        match terminal {
            Some(end) => {
                let matra = chars.remove(i);
                chars.insert(end, matra);
                // The moved sign now sits at `end`; resume after it.
                i = end + 1;
            }
            None => i += 1,
        }
    }
    chars
}

/// Pass 3: independent vowel + own vowel sign → precomposed vowel.
fn fuse_vowels(mut text: String) -> String {
    for (pair, fused) in VOWEL_FUSIONS {
        if text.contains(pair) {
            text = text.replace(pair, fused);
        }
    }
    text
}
