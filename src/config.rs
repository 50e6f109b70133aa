//! Configuration for segmentation, parsing and canonical record assembly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for title detection and composition segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Title font-size ratios relative to body size, tried strictest first.
    pub threshold_ladder: Vec<f32>,

    /// Minimum deduplicated titles for a threshold to be accepted.
    pub min_titles: usize,

    /// Fraction of page height counted as "top of page".
    pub top_of_page_fraction: f32,

    /// Vertical window (points) below a title searched for raga/tala lines.
    pub metadata_window: f32,

    /// Same-page vertical distance (points) under which candidates merge.
    pub dedup_distance: f32,

    /// Dotted leaders needed before a page is treated as table of contents.
    pub toc_min_leaders: usize,

    /// Body size assumed when a document carries no sized text at all.
    pub default_body_font_size: f32,

    /// Vertical tolerance (points) for spans sharing a visual line.
    pub line_tolerance: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold_ladder: vec![1.30, 1.15, 1.05],
            min_titles: 2,
            top_of_page_fraction: 0.15,
            metadata_window: 100.0,
            dedup_distance: 60.0,
            toc_min_leaders: 3,
            default_body_font_size: 12.0,
            line_tolerance: 2.0,
        }
    }
}

/// Tunables for the structure parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Turn literal `\n` escape sequences into real newlines before parsing.
    pub expand_escaped_newlines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            expand_escaped_newlines: true,
        }
    }
}

/// Top-level extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Segmenter settings.
    pub segmenter: SegmenterConfig,

    /// Structure parser settings.
    pub parser: ParserConfig,

    /// Run the diacritic normalizer over segment text.
    pub normalize_text: bool,

    /// Decode spans set in a recognised legacy Devanagari font.
    pub decode_legacy_fonts: bool,

    /// Byte cap for each lyric section text in canonical output.
    pub max_section_bytes: usize,

    /// Characters of segment text handed to the header field extractor.
    pub header_window_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            parser: ParserConfig::default(),
            normalize_text: true,
            decode_legacy_fonts: true,
            max_section_bytes: 1800,
            header_window_chars: 500,
        }
    }

    /// Load a (possibly partial) configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the segmenter cannot work with.
    pub fn validate(&self) -> Result<()> {
        let ladder = &self.segmenter.threshold_ladder;
        if ladder.is_empty() {
            return Err(Error::InvalidConfig("threshold ladder is empty".to_string()));
        }
        if ladder.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "threshold ladder must hold positive ratios, got {:?}",
                ladder
            )));
        }
        if ladder.windows(2).any(|w| w[1] >= w[0]) {
            return Err(Error::InvalidConfig(format!(
                "threshold ladder must be strictly descending, got {:?}",
                ladder
            )));
        }
        if self.segmenter.min_titles == 0 {
            return Err(Error::InvalidConfig("min_titles must be at least 1".to_string()));
        }
        for (name, value) in [
            ("metadata_window", self.segmenter.metadata_window),
            ("dedup_distance", self.segmenter.dedup_distance),
            ("default_body_font_size", self.segmenter.default_body_font_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(0.0..=1.0).contains(&self.segmenter.top_of_page_fraction) {
            return Err(Error::InvalidConfig(format!(
                "top_of_page_fraction must be within 0..=1, got {}",
                self.segmenter.top_of_page_fraction
            )));
        }
        if self.max_section_bytes == 0 {
            return Err(Error::InvalidConfig("max_section_bytes must be positive".to_string()));
        }
        Ok(())
    }

    /// Replace the segmenter settings.
    pub fn with_segmenter(mut self, segmenter: SegmenterConfig) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Enable or disable diacritic normalization.
    pub fn with_normalization(mut self, enable: bool) -> Self {
        self.normalize_text = enable;
        self
    }

    /// Enable or disable legacy font decoding.
    pub fn with_legacy_decoding(mut self, enable: bool) -> Self {
        self.decode_legacy_fonts = enable;
        self
    }

    /// Set the per-section byte cap.
    pub fn with_max_section_bytes(mut self, max_bytes: usize) -> Self {
        self.max_section_bytes = max_bytes;
        self
    }
}
