//! Unicode script classification for domain characters

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Writing script of a single character
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    Latin,
    Cyrillic,
    Greek,
    Hiragana,
    Katakana,
    Cjk,
    Unknown,
}

/// Classify one character by Unicode block
///
/// Digits, punctuation, and anything outside the recognized blocks map to
/// [`ScriptType::Unknown`]. Fullwidth Latin forms classify as Latin.
pub fn classify_char(c: char) -> ScriptType {
    match c as u32 {
        // ASCII letters, Latin-1 letters, Latin Extended-A/B
        0x0041..=0x005A | 0x0061..=0x007A => ScriptType::Latin,
        0x00C0..=0x00FF | 0x0100..=0x024F => ScriptType::Latin,
        // Fullwidth Latin forms
        0xFF21..=0xFF3A | 0xFF41..=0xFF5A => ScriptType::Latin,
        // Greek and Coptic, Greek Extended
        0x0370..=0x03FF | 0x1F00..=0x1FFF => ScriptType::Greek,
        // Cyrillic, Cyrillic Supplement
        0x0400..=0x04FF | 0x0500..=0x052F => ScriptType::Cyrillic,
        0x3040..=0x309F => ScriptType::Hiragana,
        // Katakana, Katakana Phonetic Extensions
        0x30A0..=0x30FF | 0x31F0..=0x31FF => ScriptType::Katakana,
        // CJK Unified Ideographs (+ Extension A, compatibility)
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF => ScriptType::Cjk,
        _ => ScriptType::Unknown,
    }
}

/// Distinct scripts present in a domain; never contains `Unknown`
pub fn detect_scripts(domain: &str) -> BTreeSet<ScriptType> {
    domain
        .chars()
        .map(classify_char)
        .filter(|s| *s != ScriptType::Unknown)
        .collect()
}

/// Whether the script mix itself is a typosquat signal
///
/// Only Latin co-occurring with Cyrillic or Greek is suspicious: those pairs
/// carry visually indistinguishable letters. Latin mixing with CJK or kana is
/// common in legitimate domains and is not flagged.
pub fn is_suspicious_mixed_script(scripts: &BTreeSet<ScriptType>) -> bool {
    scripts.contains(&ScriptType::Latin)
        && (scripts.contains(&ScriptType::Cyrillic) || scripts.contains(&ScriptType::Greek))
}
