//! Text-level processing: diacritic repair, script detection, transliteration.

pub mod normalizer;
pub mod script;
pub mod transliterate;

pub use normalizer::{cleanup_raga_tala_name, normalize};
pub use script::{detect_script, Script, ScriptCounts};
pub use transliterate::devanagari_to_iast;
