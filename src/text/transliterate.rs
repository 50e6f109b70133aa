//! Devanagari to IAST transliteration.
//!
//! Used to give Devanagari titles a Latin alternate form that downstream
//! matching against reference catalogs can work with.

use phf::phf_map;

static INDEPENDENT_VOWELS: phf::Map<char, &'static str> = phf_map! {
    'अ' => "a",
    'आ' => "ā",
    'इ' => "i",
    'ई' => "ī",
    'उ' => "u",
    'ऊ' => "ū",
    'ऋ' => "ṛ",
    'ॠ' => "ṝ",
    'ऌ' => "ḷ",
    'ए' => "e",
    'ऐ' => "ai",
    'ओ' => "o",
    'औ' => "au",
};

static VOWEL_SIGNS: phf::Map<char, &'static str> = phf_map! {
    'ा' => "ā",
    'ि' => "i",
    'ी' => "ī",
    'ु' => "u",
    'ू' => "ū",
    'ृ' => "ṛ",
    'ॄ' => "ṝ",
    'ॢ' => "ḷ",
    'े' => "e",
    'ै' => "ai",
    'ो' => "o",
    'ौ' => "au",
};

static CONSONANTS: phf::Map<char, &'static str> = phf_map! {
    'क' => "k",
    'ख' => "kh",
    'ग' => "g",
    'घ' => "gh",
    'ङ' => "ṅ",
    'च' => "c",
    'छ' => "ch",
    'ज' => "j",
    'झ' => "jh",
    'ञ' => "ñ",
    'ट' => "ṭ",
    'ठ' => "ṭh",
    'ड' => "ḍ",
    'ढ' => "ḍh",
    'ण' => "ṇ",
    'त' => "t",
    'थ' => "th",
    'द' => "d",
    'ध' => "dh",
    'न' => "n",
    'प' => "p",
    'फ' => "ph",
    'ब' => "b",
    'भ' => "bh",
    'म' => "m",
    'य' => "y",
    'र' => "r",
    'ल' => "l",
    'ळ' => "ḷ",
    'व' => "v",
    'श' => "ś",
    'ष' => "ṣ",
    'स' => "s",
    'ह' => "h",
};

static SIGNS: phf::Map<char, &'static str> = phf_map! {
    'ं' => "ṃ",
    'ः' => "ḥ",
    'ँ' => "m̐",
    'ऽ' => "'",
    'ॐ' => "oṃ",
    '।' => "|",
    '॥' => "||",
};

const VIRAMA: char = '\u{094D}';
const NUKTA: char = '\u{093C}';

/// Transliterate Devanagari text to IAST.
///
/// Characters outside Devanagari pass through unchanged, so mixed text keeps
/// its Latin parts.
///
/// ```
/// use kriti_oxide::text::transliterate::devanagari_to_iast;
///
/// assert_eq!(devanagari_to_iast("रागं"), "rāgaṃ");
/// assert_eq!(devanagari_to_iast("अखिलाण्डेश्वरि"), "akhilāṇḍeśvari");
/// ```
pub fn devanagari_to_iast(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(base) = CONSONANTS.get(&ch) {
            out.push_str(base);
            if chars.peek() == Some(&NUKTA) {
                chars.next();
            }
            match chars.peek().copied() {
                Some(VIRAMA) => {
                    chars.next();
                },
                Some(next) if VOWEL_SIGNS.contains_key(&next) => {
                    chars.next();
                    if let Some(sign) = VOWEL_SIGNS.get(&next) {
                        out.push_str(sign);
                    }
                },
                _ => out.push('a'),
            }
        } else if let Some(vowel) = INDEPENDENT_VOWELS.get(&ch) {
            out.push_str(vowel);
        } else if let Some(sign) = SIGNS.get(&ch) {
            out.push_str(sign);
        } else if let Some(sign) = VOWEL_SIGNS.get(&ch) {
            // Stray vowel sign with no consonant before it.
            out.push_str(sign);
        } else if ('\u{0966}'..='\u{096F}').contains(&ch) {
            let digit = ch as u32 - 0x0966;
            out.push(char::from_digit(digit, 10).unwrap_or(ch));
        } else if ch == VIRAMA || ch == NUKTA {
            continue;
        } else {
            out.push(ch);
        }
    }

    out
}
