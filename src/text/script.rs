//! Script identification by Unicode block.
//!
//! Lyric variants are keyed by script. Detection is a majority vote over the
//! characters of a line: each character in a recognised block counts once for
//! that block's script; the script with most votes wins, earlier scripts in
//! [`Script::ALL`] breaking ties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Writing systems a composition may be printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Devanagari (U+0900-U+097F)
    Devanagari,
    /// Kannada (U+0C80-U+0CFF)
    Kannada,
    /// Latin incl. IAST diacritics (U+0041-U+024F, U+1E00-U+1EFF)
    Latin,
    /// Malayalam (U+0D00-U+0D7F)
    Malayalam,
    /// Tamil (U+0B80-U+0BFF)
    Tamil,
    /// Telugu (U+0C00-U+0C7F)
    Telugu,
}

impl Script {
    /// Vote order; earlier entries win ties.
    pub const ALL: [Script; 6] = [
        Script::Devanagari,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
        Script::Latin,
    ];

    /// Stable lowercase code used in output.
    pub fn code(&self) -> &'static str {
        match self {
            Script::Devanagari => "devanagari",
            Script::Tamil => "tamil",
            Script::Telugu => "telugu",
            Script::Kannada => "kannada",
            Script::Malayalam => "malayalam",
            Script::Latin => "latin",
        }
    }

    /// Default language code for text in this script.
    pub fn default_language(&self) -> &'static str {
        match self {
            Script::Devanagari => "sa",
            Script::Tamil => "ta",
            Script::Telugu => "te",
            Script::Kannada => "kn",
            Script::Malayalam => "ml",
            Script::Latin => "en",
        }
    }

    /// Script of a single character, if it belongs to a recognised block.
    pub fn of_char(ch: char) -> Option<Script> {
        match ch as u32 {
            0x0900..=0x097F => Some(Script::Devanagari),
            0x0B80..=0x0BFF => Some(Script::Tamil),
            0x0C00..=0x0C7F => Some(Script::Telugu),
            0x0C80..=0x0CFF => Some(Script::Kannada),
            0x0D00..=0x0D7F => Some(Script::Malayalam),
            0x0041..=0x024F | 0x1E00..=0x1EFF => {
                if ch.is_alphabetic() {
                    Some(Script::Latin)
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    fn index(&self) -> usize {
        Script::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-script character counts for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    counts: [usize; 6],
}

impl ScriptCounts {
    /// Count the characters of `text` per script.
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for ch in text.chars() {
            if let Some(script) = Script::of_char(ch) {
                counts.counts[script.index()] += 1;
            }
        }
        counts
    }

    /// Characters counted for `script`.
    pub fn get(&self, script: Script) -> usize {
        self.counts[script.index()]
    }

    /// Characters counted across all scripts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Script with most characters, `None` if nothing was counted.
    pub fn majority(&self) -> Option<Script> {
        let mut best: Option<(Script, usize)> = None;
        for script in Script::ALL {
            let n = self.get(script);
            if n > 0 && best.map_or(true, |(_, b)| n > b) {
                best = Some((script, n));
            }
        }
        best.map(|(s, _)| s)
    }
}

/// Majority script of `text`, `None` when it has no recognised characters.
pub fn detect_script(text: &str) -> Option<Script> {
    ScriptCounts::of(text).majority()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_single_scripts() {
        assert_eq!(detect_script("अखिलाण्डेश्वरि"), Some(Script::Devanagari));
        assert_eq!(detect_script("பல்லவி"), Some(Script::Tamil));
        assert_eq!(detect_script("పల్లవి"), Some(Script::Telugu));
        assert_eq!(detect_script("ಪಲ್ಲವಿ"), Some(Script::Kannada));
        assert_eq!(detect_script("പല്ലവി"), Some(Script::Malayalam));
        assert_eq!(detect_script("akhilāṇḍeśvari"), Some(Script::Latin));
    }

    #[test]
    fn test_majority_vote() {
        assert_eq!(detect_script("राग: kalyani"), Some(Script::Latin));
        assert_eq!(detect_script("रागं कल्याणि ab"), Some(Script::Devanagari));
    }

    #[test]
    fn test_tie_prefers_earlier_script() {
        assert_eq!(detect_script("कa"), Some(Script::Devanagari));
    }

    #[test]
    fn test_no_script() {
        assert_eq!(detect_script("123 -- ::"), None);
        assert_eq!(detect_script(""), None);
    }

    #[test]
    fn test_codes() {
        assert_eq!(Script::Devanagari.code(), "devanagari");
        assert_eq!(Script::Tamil.default_language(), "ta");
        assert_eq!(serde_json::to_string(&Script::Latin).unwrap(), "\"latin\"");
    }
}
