//! Table of contents page detection.
//!
//! Anthology front matter lists every composition with a dotted leader
//! running to its page number (`Akhilandesvari . . . . . . 17`). Titles on
//! those pages are set in the same style as real composition titles, so the
//! segmenter skips such pages when searching for title candidates.

use lazy_static::lazy_static;
use regex::Regex;

use crate::layout::text_block::Page;

lazy_static! {
    /// Spaced dotted leader: at least four ". " pairs
    static ref RE_DOT_LEADER: Regex = Regex::new(r"(?:\.\s){4,}").unwrap();

    /// Entry line: title, leader, optional page number
    static ref RE_TOC_ENTRY: Regex =
        Regex::new(r"^(?P<title>.*?\S)\s*(?:\.\s){4,}\.?\s*(?P<page>\d+)?\s*$").unwrap();
}

/// One entry listed on a contents page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Listed title
    pub title: String,
    /// Page number, when the leader ends in one
    pub page_number: Option<u32>,
}

/// Dotted-leader contents page detector.
#[derive(Debug, Clone)]
pub struct TocDetector {
    /// Minimum number of leaders for a page to count as contents (default: 3)
    pub min_leaders: usize,
}

impl Default for TocDetector {
    fn default() -> Self {
        Self { min_leaders: 3 }
    }
}

impl TocDetector {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector requiring `min_leaders` leaders per page.
    pub fn with_min_leaders(min_leaders: usize) -> Self {
        Self { min_leaders }
    }

    /// Number of dotted leaders in a text.
    pub fn count_leaders(text: &str) -> usize {
        RE_DOT_LEADER.find_iter(text).count()
    }

    /// Whether the page is a table of contents.
    pub fn is_toc_page(&self, page: &Page) -> bool {
        Self::count_leaders(&page.plain_text()) >= self.min_leaders
    }

    /// Entries listed on a page, one per leader line.
    pub fn entries(&self, page: &Page) -> Vec<TocEntry> {
        page.spans
            .iter()
            .filter_map(|span| parse_entry(span.text.trim()))
            .collect()
    }
}

/// Parse a single contents line.
fn parse_entry(line: &str) -> Option<TocEntry> {
    let caps = RE_TOC_ENTRY.captures(line)?;
    let title = caps.name("title")?.as_str().trim().to_string();
    let page_number = caps.name("page").and_then(|m| m.as_str().parse::<u32>().ok());
    Some(TocEntry { title, page_number })
}
