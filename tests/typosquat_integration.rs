use vigil::config::TyposquatConfig;
use vigil::typosquat::{calculate_heuristics, decode_punycode, ScriptType};

fn config() -> TyposquatConfig {
    TyposquatConfig::default()
}

#[test]
fn test_digit_substitution_stays_below_default_threshold() {
    let result = calculate_heuristics("paypa1.com", &config());
    assert!(result.total_score > 0.0);
    assert!(result.total_score < config().heuristic_threshold);
    assert_eq!(result.homoglyphs.len(), 1);
    assert_eq!(result.homoglyphs[0].possible_replacement, "l");
}

#[test]
fn test_cyrillic_injection_reaches_default_threshold() {
    // Cyrillic "а" in an otherwise Latin label
    let result = calculate_heuristics("pаypal.com", &config());
    assert!(result.has_mixed_script);
    assert!(result.detected_scripts.contains(&ScriptType::Latin));
    assert!(result.detected_scripts.contains(&ScriptType::Cyrillic));
    // one lookalike (20) plus the mixed-script penalty (30)
    assert!(result.total_score >= config().heuristic_threshold);
}

#[test]
fn test_punycode_is_decoded_before_detection() {
    // "аррӏе.com" hidden behind its punycode encoding
    let result = calculate_heuristics("xn--80ak6aa92e.com", &config());
    assert!(result.is_punycode);
    assert!(result.breakdown.cyrillic_homoglyphs > 0.0);
    assert!(result.breakdown.punycode > 0.0);
    assert!(result.total_score >= config().heuristic_threshold);
}

#[test]
fn test_legitimate_idn_scores_only_the_punycode_penalty() {
    assert_eq!(decode_punycode("xn--mnchen-3ya.de"), "münchen.de");

    let result = calculate_heuristics("xn--mnchen-3ya.de", &config());
    assert!(result.is_punycode);
    assert_eq!(result.breakdown.cyrillic_homoglyphs, 0.0);
    assert!(result.total_score < config().heuristic_threshold);

    let quiet = TyposquatConfig {
        warn_on_punycode: false,
        ..config()
    };
    assert_eq!(calculate_heuristics("xn--mnchen-3ya.de", &quiet).total_score, 0.0);
}

#[test]
fn test_japanese_fullwidth_gating() {
    let on = calculate_heuristics("ｇｏｏgle.com", &config());
    assert!(on.breakdown.japanese_homoglyphs > 0.0);

    let off = TyposquatConfig {
        detect_japanese_homoglyphs: false,
        ..config()
    };
    let result = calculate_heuristics("ｇｏｏgle.com", &off);
    assert_eq!(result.breakdown.japanese_homoglyphs, 0.0);
    assert!(result.total_score <= on.total_score);
}

#[test]
fn test_clean_domains_score_zero() {
    for domain in ["example.com", "google.com", "sub.domain.co.uk", "api.service.io"] {
        let result = calculate_heuristics(domain, &config());
        assert_eq!(result.total_score, 0.0, "false positive on {domain}");
    }
}

#[test]
fn test_garbage_input_never_panics() {
    for input in ["", "xn--", "xn--!!!", "....", "🦀🦀🦀", "a\u{0301}.com", "\u{FFFF}"] {
        let result = calculate_heuristics(input, &config());
        assert!((0.0..=100.0).contains(&result.total_score));
    }
}
