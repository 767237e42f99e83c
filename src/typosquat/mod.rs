//! Typosquat heuristics engine
//!
//! This module provides:
//! - Per-character Unicode script classification and mixed-script detection
//! - Homoglyph detection for Latin digit/digraph tricks, Cyrillic lookalikes,
//!   and Japanese fullwidth forms
//! - Best-effort punycode handling
//! - A weighted, capped heuristic score with a per-component breakdown
//!
//! Every function is pure and total: identical input yields an identical
//! result, and arbitrary Unicode (including malformed punycode) never panics.

mod heuristics;
mod homoglyph;
mod punycode;
mod script;

pub use heuristics::{calculate_heuristics, HeuristicsBreakdown, TyposquatHeuristics};
pub use homoglyph::{
    detect_cyrillic_homoglyphs, detect_japanese_homoglyphs, detect_latin_homoglyphs, Homoglyph,
};
pub use punycode::{decode_punycode, is_punycode_domain};
pub use script::{classify_char, detect_scripts, is_suspicious_mixed_script, ScriptType};
