//! Velthuis Devanagari glyph-code to Unicode mapping.
//!
//! The Velthuis `dvng` Type 1 fonts used by scholarly Sanskrit typesetting carry
//! no ToUnicode CMap, so extractors hand over raw glyph codes. This table is the
//! font's encoding vector expressed as Unicode text: one code may expand to a
//! consonant cluster (half forms, conjunct ligatures).
//!
//! # Coverage
//!
//! - Independent vowels (a, i, u, e)
//! - Dependent vowel signs, including the left-side i-mātrā (code 69)
//! - Consonants and the retroflex LLA
//! - Half forms (consonant + virāma)
//! - Conjunct ligatures
//! - Anusvāra, visarga, virāma, repha
//! - ASCII digits and the few punctuation glyphs the font provides
//!
//! Codes absent from the table pass through unchanged.

use phf::phf_map;

/// Version of the glyph table. Bump when entries change.
pub const GLYPH_TABLE_VERSION: u32 = 1;

/// Font-name prefix (case-insensitive) identifying the Velthuis Devanagari family.
pub const VELTHUIS_FONT_PREFIX: &str = "velthuis-dvng";

/// Virāma (halant).
pub const VIRAMA: char = '\u{094D}';

/// Vowel signs drawn before their consonant cluster but encoded after it.
pub const LEFT_SIDE_MATRAS: &[char] = &['\u{093F}'];

/// Independent vowel + own vowel sign pairs produced by span splitting,
/// with the precomposed vowel they fuse into.
pub const VOWEL_FUSIONS: &[(&str, &str)] = &[
    ("\u{0905}\u{093E}", "\u{0906}"), // अ + ा → आ
    ("\u{0907}\u{0940}", "\u{0908}"), // इ + ी → ई
    ("\u{0909}\u{0942}", "\u{090A}"), // उ + ू → ऊ
];

/// Glyph code → Unicode text.
static VELTHUIS_DVNG_MAP: phf::Map<u32, &'static str> = phf_map! {
    // Independent vowels
    97u32 => "\u{0905}",   // a → अ
    105u32 => "\u{0907}",  // i → इ
    117u32 => "\u{0909}",  // u → उ
    101u32 => "\u{090F}",  // e → ए

    // Dependent vowel signs
    65u32 => "\u{093E}",   // A → ा
    69u32 => "\u{093F}",   // E → ि (left-side)
    70u32 => "\u{0940}",   // F → ी
    0u32 => "\u{0941}",    // ु
    1u32 => "\u{0942}",    // ू
    3u32 => "\u{0947}",    // े
    111u32 => "\u{094B}",  // o → ो
    123u32 => "\u{0948}",  // { → ै
    79u32 => "\u{094C}",   // O → ौ
    2u32 => "\u{0943}",    // ृ

    // Consonants
    107u32 => "\u{0915}",  // k → क
    75u32 => "\u{0916}",   // K → ख
    103u32 => "\u{0917}",  // g → ग
    71u32 => "\u{0918}",   // G → घ
    99u32 => "\u{091A}",   // c → च
    67u32 => "\u{091B}",   // C → छ
    106u32 => "\u{091C}",  // j → ज
    74u32 => "\u{091D}",   // J → झ
    86u32 => "\u{091F}",   // V → ट
    87u32 => "\u{0920}",   // W → ठ
    88u32 => "\u{0921}",   // X → ड
    89u32 => "\u{0922}",   // Y → ढ
    90u32 => "\u{0923}",   // Z → ण
    116u32 => "\u{0924}",  // t → त
    84u32 => "\u{0925}",   // T → थ
    100u32 => "\u{0926}",  // d → द
    68u32 => "\u{0927}",   // D → ध
    110u32 => "\u{0928}",  // n → न
    112u32 => "\u{092A}",  // p → प
    80u32 => "\u{092B}",   // P → फ
    98u32 => "\u{092C}",   // b → ब
    66u32 => "\u{092D}",   // B → भ
    109u32 => "\u{092E}",  // m → म
    121u32 => "\u{092F}",  // y → य
    114u32 => "\u{0930}",  // r → र
    108u32 => "\u{0932}",  // l → ल
    15u32 => "\u{0933}",   // ळ
    118u32 => "\u{0935}",  // v → व
    102u32 => "\u{0936}",  // f → श
    113u32 => "\u{0937}",  // q → ष
    115u32 => "\u{0938}",  // s → स
    104u32 => "\u{0939}",  // h → ह

    // Half forms
    6u32 => "\u{0928}\u{094D}",   // न्
    23u32 => "\u{0923}\u{094D}",  // ण्
    91u32 => "\u{0936}\u{094D}",  // [ → श्
    77u32 => "\u{092E}\u{094D}",  // M → म्
    5u32 => "\u{092F}\u{094D}",   // य्
    4u32 => "\u{0930}\u{094D}",   // र्
    7u32 => "\u{0932}\u{094D}",   // ल्
    8u32 => "\u{0924}\u{094D}",   // त्
    9u32 => "\u{0926}\u{094D}",   // द्
    10u32 => "\u{0915}\u{094D}",  // क्
    11u32 => "\u{0917}\u{094D}",  // ग्
    12u32 => "\u{092A}\u{094D}",  // प्
    14u32 => "\u{092C}\u{094D}",  // ब्
    16u32 => "\u{0935}\u{094D}",  // व्
    17u32 => "\u{091A}\u{094D}",  // च्
    18u32 => "\u{091C}\u{094D}",  // ज्
    19u32 => "\u{0938}\u{094D}",  // स्
    20u32 => "\u{0939}\u{094D}",  // ह्
    21u32 => "\u{0937}\u{094D}",  // ष्
    22u32 => "\u{0928}\u{094D}",  // न् (alternate)

    // Conjunct ligatures
    34u32 => "\u{0915}\u{094D}\u{0937}",   // " → क्ष
    152u32 => "\u{0936}\u{094D}\u{0935}",  // श्व
    153u32 => "\u{0936}\u{094D}\u{0930}",  // श्र
    165u32 => "\u{0932}\u{094D}\u{0932}",  // ल्ल
    163u32 => "\u{0937}\u{094D}\u{091F}",  // ष्ट
    226u32 => "\u{091C}\u{094D}\u{091E}",  // ज्ञ
    129u32 => "\u{0924}\u{094D}\u{0924}",  // त्त
    130u32 => "\u{0926}\u{094D}\u{0926}",  // द्द
    131u32 => "\u{0926}\u{094D}\u{0927}",  // द्ध
    132u32 => "\u{0926}\u{094D}\u{0935}",  // द्व
    133u32 => "\u{0926}\u{094D}\u{092F}",  // द्य
    134u32 => "\u{0939}\u{094D}\u{0928}",  // ह्न
    135u32 => "\u{0939}\u{094D}\u{092E}",  // ह्म
    136u32 => "\u{0939}\u{094D}\u{092F}",  // ह्य
    137u32 => "\u{0939}\u{094D}\u{0930}",  // ह्र
    138u32 => "\u{0939}\u{094D}\u{0932}",  // ह्ल
    139u32 => "\u{0939}\u{094D}\u{0935}",  // ह्व
    164u32 => "\u{0924}\u{094D}\u{0930}",  // त्र
    166u32 => "\u{0928}\u{094D}\u{0928}",  // न्न
    167u32 => "\u{0928}\u{094D}\u{0926}",  // न्द
    168u32 => "\u{0928}\u{094D}\u{0927}",  // न्ध

    // Marks
    92u32 => "\u{0902}",           // \ → ं
    94u32 => "\u{094D}",           // ^ → ्
    44u32 => "\u{0903}",           // , → ः
    13u32 => "\u{0930}\u{094D}",   // repha

    // Digits
    48u32 => "0",
    49u32 => "1",
    50u32 => "2",
    51u32 => "3",
    52u32 => "4",
    53u32 => "5",
    54u32 => "6",
    55u32 => "7",
    56u32 => "8",
    57u32 => "9",

    // Punctuation
    32u32 => " ",
    40u32 => "(",
    41u32 => ")",
    58u32 => ":",
    46u32 => ".",
};

/// Look up the Unicode text for a Velthuis glyph code.
///
/// # Arguments
///
/// * `code` - The raw character code as extracted (a char's scalar value)
///
/// # Returns
///
/// `Some(text)` when the code is in the font's encoding vector, `None` otherwise.
#[inline]
pub fn lookup(code: u32) -> Option<&'static str> {
    VELTHUIS_DVNG_MAP.get(&code).copied()
}

/// Number of entries in the glyph table.
pub fn table_len() -> usize {
    VELTHUIS_DVNG_MAP.len()
}

/// True for Devanagari consonants KA..HA.
#[inline]
pub fn is_consonant(ch: char) -> bool {
    ('\u{0915}'..='\u{0939}').contains(&ch)
}

/// Whether a font name identifies the Velthuis Devanagari family.
pub fn is_legacy_font(font_name: &str) -> bool {
    font_name
        .get(..VELTHUIS_FONT_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(VELTHUIS_FONT_PREFIX))
}
