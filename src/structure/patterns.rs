//! Header, boundary and sub-marker pattern tables.
//!
//! Section headers appear in many spellings: English transliterations with or
//! without diacritics (`charanam`, `caraṇam`, `caran. am`), one-letter
//! abbreviations (`P`, `A`, `C`), and native-script words or initials in five
//! Indic scripts. They are kept in one canonical data table,
//! [`CANONICAL_HEADERS`], compiled into a [`HeaderTable`].
//!
//! A table can be audited with [`HeaderTable::conflicts`], which reports any
//! alias that maps to more than one target. The canonical table is audited the
//! first time it is used and conflicts are logged, never resolved silently.

use crate::structure::types::{BoundaryLabel, SectionKind};
use crate::text::Script;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use HeaderTarget::{Commentary, Section};
use SectionKind::*;

/// What a header line opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderTarget {
    /// A lyric section
    Section(SectionKind),
    /// A commentary block
    Commentary(BoundaryLabel),
}

/// How a header pattern is anchored and terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Latin word: decorative prefix allowed, case-insensitive
    LatinWord,
    /// Single letter or initial: case-sensitive, must be followed by a separator
    Abbreviation,
    /// Native-script word: case-insensitive, must be followed by a separator
    IndicWord,
}

/// One entry of a header table.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPattern {
    /// Canonical spelling used for conflict auditing
    pub alias: &'static str,
    /// Regex body, without anchoring or terminator
    pub body: &'static str,
    /// Anchoring and terminator style
    pub style: HeaderStyle,
    /// What the header opens
    pub target: HeaderTarget,
}

const fn latin(alias: &'static str, body: &'static str, target: HeaderTarget) -> HeaderPattern {
    HeaderPattern {
        alias,
        body,
        style: HeaderStyle::LatinWord,
        target,
    }
}

const fn abbrev(alias: &'static str, kind: SectionKind) -> HeaderPattern {
    HeaderPattern {
        alias,
        body: alias,
        style: HeaderStyle::Abbreviation,
        target: HeaderTarget::Section(kind),
    }
}

const fn indic(alias: &'static str, body: &'static str, kind: SectionKind) -> HeaderPattern {
    HeaderPattern {
        alias,
        body,
        style: HeaderStyle::IndicWord,
        target: HeaderTarget::Section(kind),
    }
}

/// Version of [`CANONICAL_HEADERS`]. Bump when entries change.
pub const HEADER_TABLE_VERSION: u32 = 1;

/// The canonical header table, tried in order.
pub const CANONICAL_HEADERS: &[HeaderPattern] = &[
    // Latin transliterations
    latin("samashti charanam", r"sama(?:sh|s|ṣ)?[tṭ]i\s+(?:ch|c)ara?[nṇ](?:\.\s*am|am)", Section(CompositeVerse)),
    latin("anupallavi", r"anupallavi", Section(SubRefrain)),
    latin("pallavi", r"pallavi", Section(Refrain)),
    latin("charanam", r"(?:ch|c)ara?[nṇ](?:\.\s*am|am)", Section(Verse)),
    latin("chittaswaram", r"(?:chitta|citta)\s*s[vw]aram", Section(OrnamentSet)),
    latin(
        "madhyama kala",
        r"(?:madhyama\s*k[aā]la|m\.\s*k)(?:\s+s[aā]hityam)?",
        Section(MediumTempo),
    ),
    latin("swara sahitya", r"s[vw]ara\s*s[aā]hityam?", Section(AuxLyric)),
    // Commentary headers
    latin("meaning", r"meaning", Commentary(BoundaryLabel::Meaning)),
    latin("notes", r"notes?", Commentary(BoundaryLabel::Notes)),
    latin("gist", r"gist", Commentary(BoundaryLabel::Gist)),
    latin("word division", r"word\s+division", Commentary(BoundaryLabel::WordDivision)),
    latin("variations", r"variations?", Commentary(BoundaryLabel::Variations)),
    // Latin abbreviations
    abbrev("Ch", Verse),
    abbrev("P", Refrain),
    abbrev("A", SubRefrain),
    abbrev("C", Verse),
    // Devanagari
    indic("समष्टि चरणम्", r"समष्टि\s+चरणम्", CompositeVerse),
    indic("अनुपल्लवि", r"अनुपल्लवि", SubRefrain),
    indic("पल्लवि", r"पल्लवि", Refrain),
    indic("चरणम्", r"चरणम्", Verse),
    indic("मध्यम काल साहित्यम्", r"[(]?मध्यम\s+काल\s+साहित्यम्[)]?", MediumTempo),
    abbrev("प", Refrain),
    abbrev("अ", SubRefrain),
    abbrev("च", Verse),
    // Tamil
    indic("ஸமஷ்டி சரணம்", r"ஸமஷ்டி\s+சரணம்", CompositeVerse),
    indic("அனுபல்லவி", r"அனுபல்லவி", SubRefrain),
    indic("பல்லவி", r"பல்லவி", Refrain),
    indic("சரணம்", r"சரணம்", Verse),
    abbrev("ப", Refrain),
    abbrev("அ", SubRefrain),
    abbrev("ச", Verse),
    // Telugu
    indic("సమష్టి చరణం", r"సమష్టి\s+చరణం", CompositeVerse),
    indic("అనుపల్లవి", r"అనుపల్లవి", SubRefrain),
    indic("పల్లవి", r"పల్లవి", Refrain),
    indic("చరణం", r"చరణం", Verse),
    abbrev("ప", Refrain),
    abbrev("అ", SubRefrain),
    abbrev("చ", Verse),
    // Kannada
    indic("ಸಮಷ್ಟಿ ಚರಣ", r"ಸಮಷ್ಟಿ\s+ಚರಣ", CompositeVerse),
    indic("ಅನುಪಲ್ಲವಿ", r"ಅನುಪಲ್ಲವಿ", SubRefrain),
    indic("ಪಲ್ಲವಿ", r"ಪಲ್ಲವಿ", Refrain),
    indic("ಚರಣ", r"ಚರಣ", Verse),
    abbrev("ಪ", Refrain),
    abbrev("ಅ", SubRefrain),
    abbrev("ಚ", Verse),
    // Malayalam
    indic("സമഷ്ടി ചരണം", r"സമഷ്ടി\s+ചരണം", CompositeVerse),
    indic("അനുപല്ലവി", r"അനുപല്ലവി", SubRefrain),
    indic("പല്ലവി", r"പല്ലവി", Refrain),
    indic("ചരണം", r"ചരണം", Verse),
    abbrev("പ", Refrain),
    abbrev("അ", SubRefrain),
    abbrev("ച", Verse),
];

const LATIN_PREFIX: &str = r"^\s*[\-–—•*()=\[\]]*\s*";
const LATIN_SUFFIX: &str = r"(?:\b|:|\.|-|\)|\]|=|$)";
const INDIC_SUFFIX: &str = r"(?:\s|:|-|\.|\)|\]|$)";
/// An abbreviation must stand alone, take a separator or carry an ordinal,
/// so "A nice line" stays a lyric.
const ABBREV_SUFFIX: &str = r"\s*(?:\.|:|-|\d+|$)";

/// A header line recognised by a [`HeaderTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// What the header opens
    pub target: HeaderTarget,
    /// Text following the header on the same line, if any
    pub remainder: String,
}

/// An alias that more than one table entry maps to different targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternConflict {
    /// The alias, lower-cased
    pub alias: String,
    /// Distinct targets in table order
    pub targets: Vec<HeaderTarget>,
}

#[derive(Debug)]
struct CompiledHeader {
    regex: Regex,
    spec: HeaderPattern,
}

/// A compiled, ordered header pattern table.
#[derive(Debug)]
pub struct HeaderTable {
    entries: Vec<CompiledHeader>,
}

lazy_static! {
    static ref CANONICAL_TABLE: HeaderTable = {
        let table = HeaderTable::new(CANONICAL_HEADERS);
        for conflict in table.conflicts() {
            log::warn!(
                "Header alias {:?} maps to conflicting targets {:?}",
                conflict.alias,
                conflict.targets
            );
        }
        table
    };

    static ref RE_TRAILING_ORDINAL: Regex = Regex::new(r"^\(?\d+\)?[.:\-]?$").unwrap();

    static ref BOUNDARY_PATTERNS: Vec<(BoundaryLabel, Regex)> = vec![
        (
            BoundaryLabel::Meaning,
            Regex::new(r"(?im)^\s*(?:meaning|artha|artham|भावार्थ)\b").unwrap(),
        ),
        (BoundaryLabel::Gist, Regex::new(r"(?im)^\s*(?:gist|summary)\b").unwrap()),
        (BoundaryLabel::Notes, Regex::new(r"(?im)^\s*(?:notes?|tippani)\b").unwrap()),
        (
            BoundaryLabel::WordDivision,
            Regex::new(r"(?im)^\s*(?:word\s*division|pada\s*ccheda)\b").unwrap(),
        ),
        (
            BoundaryLabel::Variations,
            Regex::new(r"(?im)^\s*(?:variations?|alternate\s*reading)\b").unwrap(),
        ),
    ];

    /// "1. Sri ragam", "Arabhi rāgaṁ"
    static ref RE_RAGA_SUBMARKER: Regex =
        Regex::new(r"(?i)^(?:\d+\.\s*)?(.+?)\s+r[aā]+ga[mṁṃ]\s*$").unwrap();

    /// "viloma - mohana ragam"
    static ref RE_VILOMA_SUBMARKER: Regex =
        Regex::new(r"(?i)^vil[oō]ma\s*-\s*(.+?)\s+r[aā]+ga[mṁṃ]\s*$").unwrap();

    /// Subscript digits used as decorative line numbers
    static ref RE_SUBSCRIPT_DIGITS: Regex = Regex::new(r"[\u{2080}-\u{2089}]").unwrap();
}

impl HeaderTable {
    /// Compile a header table.
    ///
    /// Entries whose pattern fails to compile are logged and skipped.
    pub fn new(specs: &[HeaderPattern]) -> Self {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let (source, case_insensitive) = match spec.style {
                HeaderStyle::LatinWord => (format!("{}(?:{}){}", LATIN_PREFIX, spec.body, LATIN_SUFFIX), true),
                HeaderStyle::Abbreviation => (format!(r"^\s*(?:{}){}", spec.body, ABBREV_SUFFIX), false),
                HeaderStyle::IndicWord => (format!(r"^\s*(?:{}){}", spec.body, INDIC_SUFFIX), true),
            };
            match RegexBuilder::new(&source).case_insensitive(case_insensitive).build() {
                Ok(regex) => entries.push(CompiledHeader { regex, spec: *spec }),
                Err(e) => log::warn!("Skipping header pattern {:?}: {}", spec.alias, e),
            }
        }
        Self { entries }
    }

    /// The canonical table, compiled and audited once.
    pub fn canonical() -> &'static HeaderTable {
        &CANONICAL_TABLE
    }

    /// Number of compiled entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a line against the table; the first matching entry wins.
    pub fn detect(&self, line: &str) -> Option<HeaderMatch> {
        self.entries.iter().find_map(|entry| {
            entry.regex.find(line).map(|m| HeaderMatch {
                target: entry.spec.target,
                remainder: clean_remainder(&line[m.end()..]),
            })
        })
    }

    /// Aliases mapped to more than one distinct target.
    pub fn conflicts(&self) -> Vec<PatternConflict> {
        let mut by_alias: IndexMap<String, Vec<HeaderTarget>> = IndexMap::new();
        for entry in &self.entries {
            let targets = by_alias.entry(entry.spec.alias.to_lowercase()).or_default();
            if !targets.contains(&entry.spec.target) {
                targets.push(entry.spec.target);
            }
        }
        by_alias
            .into_iter()
            .filter(|(_, targets)| targets.len() > 1)
            .map(|(alias, targets)| PatternConflict { alias, targets })
            .collect()
    }
}

/// Strip separators after a header and drop a bare ordinal ("Charanam 2").
fn clean_remainder(rest: &str) -> String {
    let trimmed = rest
        .trim_start_matches(|c: char| c.is_whitespace() || ":-–—)].=".contains(c))
        .trim();
    if RE_TRAILING_ORDINAL.is_match(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Language or script named by a language header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageLabel {
    /// "Devanagari"
    Devanagari,
    /// "Tamil"
    Tamil,
    /// "Telugu"
    Telugu,
    /// "Kannada"
    Kannada,
    /// "Malayalam"
    Malayalam,
    /// "English"
    English,
    /// "Roman" / "Latin"
    Latin,
    /// "Sanskrit"
    Sanskrit,
    /// "Hindi"
    Hindi,
}

impl LanguageLabel {
    /// Language code and script of lyrics under this header.
    pub fn language_and_script(&self) -> (&'static str, Script) {
        match self {
            LanguageLabel::Sanskrit | LanguageLabel::Devanagari => ("sa", Script::Devanagari),
            LanguageLabel::Hindi => ("hi", Script::Devanagari),
            LanguageLabel::Tamil => ("ta", Script::Tamil),
            LanguageLabel::Telugu => ("te", Script::Telugu),
            LanguageLabel::Kannada => ("kn", Script::Kannada),
            LanguageLabel::Malayalam => ("ml", Script::Malayalam),
            LanguageLabel::English | LanguageLabel::Latin => ("en", Script::Latin),
        }
    }
}

/// Language header keys, tried in order.
pub const LANGUAGE_HEADERS: &[(&str, LanguageLabel)] = &[
    ("devanagari", LanguageLabel::Devanagari),
    ("tamil", LanguageLabel::Tamil),
    ("telugu", LanguageLabel::Telugu),
    ("kannada", LanguageLabel::Kannada),
    ("malayalam", LanguageLabel::Malayalam),
    ("english", LanguageLabel::English),
    ("roman", LanguageLabel::Latin),
    ("latin", LanguageLabel::Latin),
    ("sanskrit", LanguageLabel::Sanskrit),
    ("hindi", LanguageLabel::Hindi),
];

/// Match a language header: the whole line is the key, or the key followed
/// by `:`, ` -` or ` –`. Returns the label and any text after the separator.
pub fn detect_language_header(line: &str) -> Option<(LanguageLabel, String)> {
    let lowered = line.to_lowercase();
    for (key, label) in LANGUAGE_HEADERS {
        let is_header = lowered == *key
            || [":", " -", " –"]
                .iter()
                .any(|sep| lowered.strip_prefix(key).is_some_and(|rest| rest.starts_with(sep)));
        if is_header {
            // Keys are ASCII, so the byte length is the same in `line`.
            let rest = line.get(key.len()..).unwrap_or("");
            let remainder = rest
                .trim_start_matches(|c: char| c == ':' || c == '-' || c == '–' || c == ' ')
                .to_string();
            return Some((*label, remainder));
        }
    }
    None
}

/// A commentary boundary found in text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryHit {
    /// Kind of commentary
    pub label: BoundaryLabel,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset of the match end
    pub end: usize,
}

/// Find every commentary boundary in `text`, sorted by start.
///
/// When several patterns match at the same start, the longest match wins.
pub fn find_boundaries(text: &str) -> Vec<BoundaryHit> {
    let mut by_start: IndexMap<usize, BoundaryHit> = IndexMap::new();
    for (label, pattern) in BOUNDARY_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let hit = BoundaryHit {
                label: *label,
                start: m.start(),
                end: m.end(),
            };
            match by_start.get(&hit.start) {
                Some(existing) if existing.end >= hit.end => {},
                _ => {
                    by_start.insert(hit.start, hit);
                },
            }
        }
    }
    let mut hits: Vec<BoundaryHit> = by_start.into_values().collect();
    hits.sort_by_key(|h| h.start);
    hits
}

/// A per-line sub-section marker inside a verse-type block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubMarker {
    /// "<raga> ragam"
    Raga(String),
    /// "viloma - <raga> ragam" (reverse reading)
    Viloma(String),
}

impl SubMarker {
    /// Label suffix used for the sub-section.
    pub fn label(&self) -> String {
        match self {
            SubMarker::Raga(name) => name.clone(),
            SubMarker::Viloma(name) => format!("Viloma - {}", name),
        }
    }
}

/// Recognise a sub-section marker line.
pub fn detect_sub_marker(line: &str) -> Option<SubMarker> {
    if let Some(caps) = RE_VILOMA_SUBMARKER.captures(line) {
        return caps.get(1).map(|m| SubMarker::Viloma(m.as_str().trim().to_string()));
    }
    RE_RAGA_SUBMARKER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| SubMarker::Raga(m.as_str().trim().to_string()))
}

const BOILERPLATE_MARKERS: &[&str] = &[
    "a i i u u",
    "ch j jh",
    "ph b bh m",
    "pronunciation guide",
    "powered by blogger",
    "newer post",
    "older post",
    "subscribe to",
    "post a comment",
    "blog archive",
    "link to this post",
    "posted by",
    "all rights reserved",
    "copyright",
    "skip to main",
    "related posts",
];

/// Navigation/footer artifacts and pronunciation-guide tables.
pub fn is_boilerplate(line: &str) -> bool {
    let lowered = line.to_lowercase();
    BOILERPLATE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Remove decorative subscript numerals.
pub fn strip_subscript_digits(line: &str) -> String {
    RE_SUBSCRIPT_DIGITS.replace_all(line, "").into_owned()
}
