//! Repair of diacritics mangled by legacy Latin font encodings.
//!
//! Fonts such as the Utopia family used in scholarly IAST typesetting emit
//! diacritics as standalone spacing characters (`¯`, `˙`, `´`, `˜`) and write
//! retroflex consonants as letter + period. Text extraction then produces
//! strings like `r¯aga ˙m` or `n. d. e`; [`normalize`] turns them back into
//! precomposed IAST (`rāgaṁ`, `ṇḍe`).
//!
//! The rules live in [`RULE_TABLE`], an ordered, versioned data table. Order
//! matters:
//!
//! 1. dotless `ı` becomes `i` before the macron rules look for `¯i`
//! 2. combining-mark rules fuse a spacing mark with its base letter
//! 3. ornamental glyphs are stripped
//! 4. consonant + period rules run once macrons have resolved (`t¯al.a`)
//! 5. trailing page numerals are dropped
//!
//! A mark separated from its letter by more than one space is left alone, so
//! a genuine double-space word boundary survives.

use lazy_static::lazy_static;
use regex::Regex;

/// Version of [`RULE_TABLE`]. Bump when rules change.
pub const RULE_TABLE_VERSION: u32 = 1;

/// Extra condition a rule match must satisfy before it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGuard {
    /// Replace every match.
    Always,
    /// Skip matches directly preceded by an ASCII uppercase letter, so
    /// abbreviations such as `Dr.` keep their period.
    NotAfterUppercase,
}

/// Stage a rule belongs to, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleStage {
    /// Dotless-letter fixes that must precede the macron rules
    DotlessLetter,
    /// Spacing diacritic + base letter fusion
    CombiningMark,
    /// Decorative separators
    Ornament,
    /// Letter + period retroflex notation
    ConsonantDot,
    /// Page/footnote numerals at the end of the text
    TrailingNumeral,
}

/// One substitution rule.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationRule {
    /// Short identifier, used in diagnostics
    pub name: &'static str,
    /// Stage the rule belongs to
    pub stage: RuleStage,
    /// Regex source
    pub pattern: &'static str,
    /// Replacement text
    pub replacement: &'static str,
    /// Extra match condition
    pub guard: RuleGuard,
}

const fn rule(
    name: &'static str,
    stage: RuleStage,
    pattern: &'static str,
    replacement: &'static str,
) -> NormalizationRule {
    NormalizationRule {
        name,
        stage,
        pattern,
        replacement,
        guard: RuleGuard::Always,
    }
}

const fn dot_rule(name: &'static str, pattern: &'static str, replacement: &'static str) -> NormalizationRule {
    NormalizationRule {
        name,
        stage: RuleStage::ConsonantDot,
        pattern,
        replacement,
        guard: RuleGuard::NotAfterUppercase,
    }
}

/// The ordered normalization rules.
pub const RULE_TABLE: &[NormalizationRule] = &[
    rule("dotless-i", RuleStage::DotlessLetter, "\u{0131}", "i"),
    // Macron
    rule("macron-a", RuleStage::CombiningMark, "\u{00AF}[ \t]?a", "ā"),
    rule("macron-A", RuleStage::CombiningMark, "\u{00AF}[ \t]?A", "Ā"),
    rule("macron-i", RuleStage::CombiningMark, "\u{00AF}[ \t]?i", "ī"),
    rule("macron-I", RuleStage::CombiningMark, "\u{00AF}[ \t]?I", "Ī"),
    rule("macron-u", RuleStage::CombiningMark, "\u{00AF}[ \t]?u", "ū"),
    rule("macron-U", RuleStage::CombiningMark, "\u{00AF}[ \t]?U", "Ū"),
    rule("macron-e", RuleStage::CombiningMark, "\u{00AF}[ \t]?e", "ē"),
    rule("macron-o", RuleStage::CombiningMark, "\u{00AF}[ \t]?o", "ō"),
    // Dot above
    rule("dot-m", RuleStage::CombiningMark, "[ \t]?\u{02D9}[ \t]?m", "ṁ"),
    rule("dot-n", RuleStage::CombiningMark, "[ \t]?\u{02D9}[ \t]?n", "ṅ"),
    rule("dot-r", RuleStage::CombiningMark, "[ \t]?\u{02D9}[ \t]?r", "ṛ"),
    // Acute
    rule("acute-s", RuleStage::CombiningMark, "\u{00B4}[ \t]?s", "ś"),
    rule("acute-S", RuleStage::CombiningMark, "\u{00B4}[ \t]?S", "Ś"),
    // Tilde
    rule("tilde-n", RuleStage::CombiningMark, "\u{02DC}[ \t]?n", "ñ"),
    rule(
        "ornaments",
        RuleStage::Ornament,
        "[\u{2619}\u{2719}-\u{2720}\u{2756}\u{2767}]",
        "",
    ),
    dot_rule("dot-s", r"s\.[ \t]?", "ṣ"),
    dot_rule("dot-n", r"n\.[ \t]?", "ṇ"),
    dot_rule("dot-d", r"d\.[ \t]?", "ḍ"),
    dot_rule("dot-t", r"t\.[ \t]?", "ṭ"),
    dot_rule("dot-l", r"l\.[ \t]?", "ḷ"),
    dot_rule("dot-r", r"r\.[ \t]?", "ṛ"),
    dot_rule("dot-h", r"h\.[ \t]?", "ḥ"),
    rule(
        "trailing-numerals",
        RuleStage::TrailingNumeral,
        r"(?:\s*\n[ \t]*[0-9\u{0966}-\u{096F}]+[ \t]*)+\s*$",
        "\n",
    ),
];

struct CompiledRule {
    regex: Regex,
    spec: &'static NormalizationRule,
}

lazy_static! {
    static ref COMPILED_RULES: Vec<CompiledRule> = RULE_TABLE
        .iter()
        .map(|spec| CompiledRule {
            regex: Regex::new(spec.pattern).unwrap(),
            spec,
        })
        .collect();

    /// Parenthesised mela / reference numbers: "(28)"
    static ref RE_MELA_NUMBER: Regex = Regex::new(r"\s*\(\d+\)\s*").unwrap();
}

/// Normalize legacy-encoded diacritics to precomposed IAST.
///
/// Total and idempotent: the rule pass is repeated until the text stops
/// changing, so `normalize(&normalize(x)) == normalize(x)` for every input.
/// Sequences no rule matches pass through unchanged.
///
/// # Examples
///
/// ```
/// use kriti_oxide::text::normalizer::normalize;
///
/// assert_eq!(normalize("r¯aga ˙m"), "rāgaṁ");
/// assert_eq!(normalize("Dr. Rao"), "Dr. Rao");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = apply_rules(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One ordered pass over the rule table.
fn apply_rules(text: &str) -> String {
    let mut result = text.to_string();
    for rule in COMPILED_RULES.iter() {
        if !rule.regex.is_match(&result) {
            continue;
        }
        result = match rule.spec.guard {
            RuleGuard::Always => rule
                .regex
                .replace_all(&result, rule.spec.replacement)
                .into_owned(),
            RuleGuard::NotAfterUppercase => {
                replace_unless_after_uppercase(&result, &rule.regex, rule.spec.replacement)
            },
        };
    }
    result
}

fn replace_unless_after_uppercase(text: &str, regex: &Regex, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in regex.find_iter(text) {
        let preceded_by_upper = text[..m.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_uppercase());
        if preceded_by_upper {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(replacement);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Clean a raga or tala name for entity resolution.
///
/// Strips parenthesised mela numbers, normalizes diacritics and title-cases.
///
/// ```
/// use kriti_oxide::text::normalizer::cleanup_raga_tala_name;
///
/// assert_eq!(cleanup_raga_tala_name("juj¯avanti (28)"), "Jujāvanti");
/// ```
pub fn cleanup_raga_tala_name(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }
    let stripped = RE_MELA_NUMBER.replace_all(name, "");
    let normalized = normalize(stripped.trim());
    title_case(normalized.trim())
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// `misra-chapu` becomes `Misra-Chapu`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_compiles_in_stage_order() {
        assert_eq!(COMPILED_RULES.len(), RULE_TABLE.len());
        assert!(RULE_TABLE.windows(2).all(|w| w[0].stage <= w[1].stage));
    }

    #[test]
    fn test_macron_and_dot_above() {
        assert_eq!(normalize("r¯aga ˙m"), "rāgaṁ");
        assert_eq!(normalize("¯adi"), "ādi");
        assert_eq!(normalize("r¯aga˙m"), "rāgaṁ");
    }

    #[test]
    fn test_dotless_i_before_macron() {
        assert_eq!(normalize("n¯ıl¯ambari"), "nīlāmbari");
        assert_eq!(normalize("ı"), "i");
    }

    #[test]
    fn test_acute_and_tilde() {
        assert_eq!(normalize("mi´sra"), "miśra");
        assert_eq!(normalize("a˜njali"), "añjali");
    }

    #[test]
    fn test_consonant_dot() {
        assert_eq!(normalize("t¯al.a ˙m"), "tāḷaṁ");
        assert_eq!(normalize("raks.a"), "rakṣa");
        assert_eq!(normalize("n. d. e"), "ṇḍe");
    }

    #[test]
    fn test_abbreviation_untouched() {
        assert_eq!(normalize("Dr. Rao"), "Dr. Rao");
        assert_eq!(normalize("Sr. Mr."), "Sr. Mr.");
    }

    #[test]
    fn test_ornaments_stripped() {
        assert_eq!(normalize("✠ pallavi ✠"), " pallavi ");
        assert_eq!(normalize("¯✠a"), "ā");
    }

    #[test]
    fn test_trailing_numerals() {
        assert_eq!(normalize("kamalāmbā\n12"), "kamalāmbā\n");
        assert_eq!(normalize("line one\n 3 \n\n"), "line one\n");
        assert_eq!(normalize("रागं\n१२"), "रागं\n");
        assert_eq!(normalize("2 kritis\nmore"), "2 kritis\nmore");
    }

    #[test]
    fn test_double_space_survives() {
        assert_eq!(normalize("¯  a"), "¯  a");
        assert_eq!(normalize("word  word"), "word  word");
    }

    #[test]
    fn test_newline_between_mark_and_letter_survives() {
        assert_eq!(normalize("¯\na"), "¯\na");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(normalize("ॐ नमः"), "ॐ नमः");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_idempotent_on_fixtures() {
        for input in ["r¯aga ˙m", "n. d. e", "Dr. n.", "¯✠a", "t¯al.a ˙m\n4", "s.s. "] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_cleanup_raga_tala_name() {
        assert_eq!(cleanup_raga_tala_name("juj¯avanti (28)"), "Jujāvanti");
        assert_eq!(cleanup_raga_tala_name("¯adi"), "Ādi");
        assert_eq!(cleanup_raga_tala_name("mi´sra c¯apu"), "Miśra Cāpu");
        assert_eq!(cleanup_raga_tala_name(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("KALYANI"), "Kalyani");
        assert_eq!(title_case("misra-chapu"), "Misra-Chapu");
    }
}
