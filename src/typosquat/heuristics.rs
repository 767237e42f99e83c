//! Weighted typosquat heuristic scoring

use crate::config::TyposquatConfig;
use crate::typosquat::{
    decode_punycode, detect_cyrillic_homoglyphs, detect_japanese_homoglyphs,
    detect_latin_homoglyphs, detect_scripts, is_punycode_domain, is_suspicious_mixed_script,
    Homoglyph, ScriptType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-component contribution to the total heuristic score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsBreakdown {
    pub latin_homoglyphs: f64,
    pub cyrillic_homoglyphs: f64,
    pub japanese_homoglyphs: f64,
    pub mixed_script: f64,
    pub punycode: f64,
}

/// Full heuristic verdict for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyposquatHeuristics {
    /// All homoglyph hits across the enabled detectors, ordered by position
    pub homoglyphs: Vec<Homoglyph>,
    pub has_mixed_script: bool,
    pub detected_scripts: BTreeSet<ScriptType>,
    pub is_punycode: bool,
    /// Weighted, capped sum of the breakdown components, in [0,100]
    pub total_score: f64,
    pub breakdown: HeuristicsBreakdown,
}

const LATIN_WEIGHT: f64 = 10.0;
const LATIN_CAP: f64 = 30.0;
const CYRILLIC_WEIGHT: f64 = 20.0;
const CYRILLIC_CAP: f64 = 40.0;
const JAPANESE_WEIGHT: f64 = 15.0;
const JAPANESE_CAP: f64 = 30.0;
const MIXED_SCRIPT_PENALTY: f64 = 30.0;
const PUNYCODE_PENALTY: f64 = 20.0;

/// Score a domain against the homoglyph/mixed-script/punycode heuristics
///
/// Punycode labels are decoded best-effort first so lookalike letters hiding
/// behind `xn--` encoding are still seen by the detectors. Each breakdown
/// component is independent and non-negative; the total is capped at 100.
pub fn calculate_heuristics(domain: &str, config: &TyposquatConfig) -> TyposquatHeuristics {
    let is_punycode = is_punycode_domain(domain);
    let inspected = if is_punycode {
        decode_punycode(domain)
    } else {
        domain.to_string()
    };

    let detected_scripts = detect_scripts(&inspected);
    let has_mixed_script = is_suspicious_mixed_script(&detected_scripts);

    let latin_hits = detect_latin_homoglyphs(&inspected);
    let cyrillic_hits = detect_cyrillic_homoglyphs(&inspected);
    let japanese_hits = if config.detect_japanese_homoglyphs {
        detect_japanese_homoglyphs(&inspected)
    } else {
        Vec::new()
    };

    let breakdown = HeuristicsBreakdown {
        latin_homoglyphs: (latin_hits.len() as f64 * LATIN_WEIGHT).min(LATIN_CAP),
        cyrillic_homoglyphs: (cyrillic_hits.len() as f64 * CYRILLIC_WEIGHT).min(CYRILLIC_CAP),
        japanese_homoglyphs: (japanese_hits.len() as f64 * JAPANESE_WEIGHT).min(JAPANESE_CAP),
        mixed_script: if has_mixed_script {
            MIXED_SCRIPT_PENALTY
        } else {
            0.0
        },
        punycode: if is_punycode && config.warn_on_punycode {
            PUNYCODE_PENALTY
        } else {
            0.0
        },
    };

    let total_score = (breakdown.latin_homoglyphs
        + breakdown.cyrillic_homoglyphs
        + breakdown.japanese_homoglyphs
        + breakdown.mixed_script
        + breakdown.punycode)
        .min(100.0);

    let mut homoglyphs = latin_hits;
    homoglyphs.extend(cyrillic_hits);
    homoglyphs.extend(japanese_hits);
    homoglyphs.sort_by_key(|h| h.position);

    TyposquatHeuristics {
        homoglyphs,
        has_mixed_script,
        detected_scripts,
        is_punycode,
        total_score,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TyposquatConfig {
        TyposquatConfig::default()
    }

    #[test]
    fn test_clean_ascii_domain() {
        let result = calculate_heuristics("example.com", &config());
        assert_eq!(result.total_score, 0.0);
        assert!(!result.has_mixed_script);
        assert!(!result.is_punycode);
        assert!(result.homoglyphs.is_empty());
        assert_eq!(result.detected_scripts.len(), 1);
        assert!(result.detected_scripts.contains(&ScriptType::Latin));
    }

    #[test]
    fn test_idempotent() {
        let a = calculate_heuristics("gооgle.com", &config());
        let b = calculate_heuristics("gооgle.com", &config());
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_bounded() {
        // Pile on every component
        let domain = "xn--rn0vv1а-есор.com";
        let result = calculate_heuristics(domain, &config());
        assert!((0.0..=100.0).contains(&result.total_score));
    }

    #[test]
    fn test_cyrillic_injection_never_decreases_score() {
        let base = calculate_heuristics("google.com", &config());
        let injected = calculate_heuristics("gооgle.com", &config());
        assert!(injected.total_score >= base.total_score);
        assert!(injected.total_score > 0.0);
        assert!(injected.has_mixed_script);
    }

    #[test]
    fn test_punycode_penalty_config_gated() {
        let with_warn = calculate_heuristics("xn--mnchen-3ya.de", &config());
        assert_eq!(with_warn.breakdown.punycode, PUNYCODE_PENALTY);
        assert!(with_warn.is_punycode);

        let quiet = TyposquatConfig {
            warn_on_punycode: false,
            ..config()
        };
        let without = calculate_heuristics("xn--mnchen-3ya.de", &quiet);
        assert_eq!(without.breakdown.punycode, 0.0);
        assert!(without.is_punycode);
        assert!(without.total_score <= with_warn.total_score);
    }

    #[test]
    fn test_japanese_detection_config_gated() {
        let on = calculate_heuristics("ｇoogle.com", &config());
        assert!(on.breakdown.japanese_homoglyphs > 0.0);

        let off_config = TyposquatConfig {
            detect_japanese_homoglyphs: false,
            ..config()
        };
        let off = calculate_heuristics("ｇoogle.com", &off_config);
        assert_eq!(off.breakdown.japanese_homoglyphs, 0.0);
    }

    #[test]
    fn test_punycode_hidden_cyrillic_detected() {
        // Decoded form exposes Cyrillic lookalikes to the detectors
        let result = calculate_heuristics("xn--80ak6aa92e.com", &config());
        assert!(result.is_punycode);
        assert!(result.breakdown.cyrillic_homoglyphs > 0.0);
    }

    #[test]
    fn test_digit_tricks_scored() {
        let result = calculate_heuristics("g00gle.com", &config());
        assert_eq!(result.breakdown.latin_homoglyphs, 20.0);
        assert_eq!(result.total_score, 20.0);
    }

    #[test]
    fn test_component_caps() {
        let result = calculate_heuristics("00000000.com", &config());
        assert_eq!(result.breakdown.latin_homoglyphs, LATIN_CAP);
    }

    #[test]
    fn test_never_panics_on_arbitrary_input() {
        for input in ["", ".", "a\u{0301}bc.com", "xn--", "\u{30FC}\u{FF21}", "🦀.com"] {
            let _ = calculate_heuristics(input, &config());
        }
    }
}
