//! Sensitive-data detection over text spans
//!
//! Runs every enabled rule's regex globally over the input, masks each match,
//! and merges near-duplicate hits of the same classification.

use crate::dlp::DlpRule;
use crate::scoring::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a sensitive text span
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    Credentials,
    Pii,
    Financial,
    Health,
    Code,
    Internal,
    Unknown,
}

impl DataClassification {
    /// Fixed severity order used by [`DlpDetector::highest_risk`]
    pub fn priority(&self) -> u8 {
        match self {
            DataClassification::Credentials => 7,
            DataClassification::Financial => 6,
            DataClassification::Health => 5,
            DataClassification::Pii => 4,
            DataClassification::Internal => 3,
            DataClassification::Code => 2,
            DataClassification::Unknown => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataClassification::Credentials => "credentials",
            DataClassification::Pii => "pii",
            DataClassification::Financial => "financial",
            DataClassification::Health => "health",
            DataClassification::Code => "code",
            DataClassification::Internal => "internal",
            DataClassification::Unknown => "unknown",
        }
    }
}

/// One detection hit with masked content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitiveDataResult {
    pub classification: DataClassification,
    pub confidence: Confidence,
    /// Id of the rule that matched
    pub pattern: String,
    /// Matched text with the interior masked; never the raw span
    pub matched_text: String,
    /// Character offset of the match in the input
    pub position: usize,
    /// Set by the blocking policy in [`crate::dlp::DlpManager`]
    #[serde(default)]
    pub blocked: bool,
}

/// Mask a matched span, keeping at most 4 leading/trailing characters
///
/// Inputs of 4 characters or fewer collapse to `"****"`. Character-boundary
/// safe on any Unicode input.
pub fn mask_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len <= 4 {
        return "****".to_string();
    }
    let visible = (len / 4).clamp(1, 4);
    let mut masked = String::with_capacity(len);
    masked.extend(&chars[..visible]);
    masked.extend(std::iter::repeat('*').take(len - 2 * visible));
    masked.extend(&chars[len - visible..]);
    masked
}

/// Minimum character distance between two kept hits of one classification
const DEDUP_WINDOW: usize = 5;

/// Regex-rule sensitive-data detector
pub struct DlpDetector {
    rules: Vec<DlpRule>,
}

impl DlpDetector {
    /// Create a detector over a compiled rule set
    pub fn new(rules: Vec<DlpRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[DlpRule] {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut [DlpRule] {
        &mut self.rules
    }

    /// Append a compiled rule at the end of the ordered set
    pub fn push_rule(&mut self, rule: DlpRule) {
        self.rules.push(rule);
    }

    /// Detect sensitive spans in `text`
    ///
    /// Results are ordered by position. Two hits of the same classification
    /// closer than 5 characters apart are merged, keeping the first.
    pub fn detect(&self, text: &str) -> Vec<SensitiveDataResult> {
        let mut hits: Vec<SensitiveDataResult> = Vec::new();

        for rule in self.rules.iter().filter(|r| r.enabled) {
            for m in rule.regex.find_iter(text) {
                let position = text[..m.start()].chars().count();
                hits.push(SensitiveDataResult {
                    classification: rule.classification,
                    confidence: rule.confidence,
                    pattern: rule.id.clone(),
                    matched_text: mask_text(m.as_str()),
                    position,
                    blocked: false,
                });
            }
        }

        hits.sort_by_key(|h| h.position);

        // Merge near-duplicates within one classification, keeping the first
        let mut merged: Vec<SensitiveDataResult> = Vec::with_capacity(hits.len());
        let mut last_kept: BTreeMap<DataClassification, usize> = BTreeMap::new();
        for hit in hits {
            if let Some(&prev) = last_kept.get(&hit.classification) {
                if hit.position.saturating_sub(prev) < DEDUP_WINDOW {
                    continue;
                }
            }
            last_kept.insert(hit.classification, hit.position);
            merged.push(hit);
        }
        merged
    }

    /// Whether `text` contains any sensitive span
    pub fn has_sensitive_data(&self, text: &str) -> bool {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .any(|r| r.regex.is_match(text))
    }

    /// Most severe classification among `results`, by fixed priority order
    pub fn highest_risk(results: &[SensitiveDataResult]) -> Option<DataClassification> {
        results
            .iter()
            .map(|r| r.classification)
            .max_by_key(|c| c.priority())
    }

    /// Hit counts per classification
    pub fn summarize(results: &[SensitiveDataResult]) -> BTreeMap<DataClassification, usize> {
        let mut counts = BTreeMap::new();
        for result in results {
            *counts.entry(result.classification).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlp::{compile_rules, default_rules};

    fn detector() -> DlpDetector {
        DlpDetector::new(compile_rules(&default_rules()).unwrap())
    }

    #[test]
    fn test_mask_short_input() {
        assert_eq!(mask_text(""), "****");
        assert_eq!(mask_text("ab"), "****");
        assert_eq!(mask_text("abcd"), "****");
    }

    #[test]
    fn test_mask_keeps_edges() {
        let masked = mask_text("SecretValue123");
        assert!(masked.starts_with("Sec"));
        assert!(masked.ends_with("123"));
        assert!(masked.contains('*'));
        assert_ne!(masked, "SecretValue123");
    }

    #[test]
    fn test_mask_never_equals_raw() {
        for raw in ["Secret123!!", "password=hunter2", "4111 1111 1111 1111"] {
            assert_ne!(mask_text(raw), raw);
        }
    }

    #[test]
    fn test_mask_unicode_safe() {
        let masked = mask_text("пароль密码 test");
        assert!(masked.contains('*'));
    }

    #[test]
    fn test_detect_password() {
        let results = detector().detect("my password: Secret123!!");
        assert!(!results.is_empty());
        assert_eq!(results[0].classification, DataClassification::Credentials);
        assert_eq!(results[0].pattern, "password_assignment");
        assert!(!results[0].matched_text.contains("Secret123"));
    }

    #[test]
    fn test_detect_is_deterministic() {
        let d = detector();
        let text = "password=hunter2 and card 4111 1111 1111 1111 for bob@example.com";
        let a = d.detect(text);
        let b = d.detect(text);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.pattern, y.pattern);
        }
    }

    #[test]
    fn test_dedup_same_classification_nearby() {
        // "password" also matches "pwd"-style overlap: craft two credential
        // hits closer than the 5-char window
        let d = detector();
        let results = d.detect("pwd=x password=y");
        let creds: Vec<_> = results
            .iter()
            .filter(|r| r.classification == DataClassification::Credentials)
            .collect();
        // "pwd=x password=y": pwd match at 0, password match at 6 — outside
        // the window, both kept
        assert_eq!(creds.len(), 2);

        let results = d.detect("pwd=a pwd=b");
        let creds: Vec<_> = results
            .iter()
            .filter(|r| r.classification == DataClassification::Credentials)
            .collect();
        // matches at 0 and 6 are kept; a match inside <5 chars would merge
        assert_eq!(creds.len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first_of_near_pair() {
        let d = detector();
        // password_assignment and api_key_assignment fire 4 chars apart;
        // same classification within 5 chars merges
        let results = d.detect("pwd=access_token=abcdefgh12345678");
        let creds: Vec<_> = results
            .iter()
            .filter(|r| r.classification == DataClassification::Credentials)
            .collect();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].position, 0);
    }

    #[test]
    fn test_different_classifications_not_merged() {
        let d = detector();
        let results = d.detect("CONFIDENTIAL bob@example.com");
        let classes: Vec<_> = results.iter().map(|r| r.classification).collect();
        assert!(classes.contains(&DataClassification::Internal));
        assert!(classes.contains(&DataClassification::Pii));
    }

    #[test]
    fn test_highest_risk_empty() {
        assert_eq!(DlpDetector::highest_risk(&[]), None);
    }

    #[test]
    fn test_highest_risk_priority_order() {
        let d = detector();
        let results = d.detect("bob@example.com paid with 4111 1111 1111 1111");
        assert_eq!(
            DlpDetector::highest_risk(&results),
            Some(DataClassification::Financial)
        );

        let results = d.detect("bob@example.com password=hunter2");
        assert_eq!(
            DlpDetector::highest_risk(&results),
            Some(DataClassification::Credentials)
        );
    }

    #[test]
    fn test_summarize_counts() {
        let d = detector();
        let results = d.detect("bob@example.com and alice@example.com");
        let summary = DlpDetector::summarize(&results);
        assert_eq!(summary.get(&DataClassification::Pii), Some(&2));
    }

    #[test]
    fn test_has_sensitive_data() {
        let d = detector();
        assert!(d.has_sensitive_data("password=hunter2"));
        assert!(!d.has_sensitive_data("nothing to see here"));
    }

    #[test]
    fn test_no_match_on_benign_text() {
        let results = detector().detect("the quick brown fox jumps over the lazy dog");
        assert!(results.is_empty());
    }

    #[test]
    fn test_bounded_time_on_pathological_input() {
        // regex's linear-time engine must stay within budget even on inputs
        // crafted to trigger backtracking blowups in lesser engines
        let d = detector();
        let adversarial = format!("{}{}", "a".repeat(50_000), "password=");
        let nested = format!("password={}!", "(a+)+".repeat(2_000));

        let start = std::time::Instant::now();
        let _ = d.detect(&adversarial);
        let _ = d.detect(&nested);
        assert!(
            start.elapsed() < std::time::Duration::from_millis(50),
            "detection exceeded time budget: {:?}",
            start.elapsed()
        );
    }
}
