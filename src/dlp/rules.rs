//! DLP rule definitions and compilation
//!
//! Rules are declared in configuration ([`crate::config::DlpRuleConfig`]) and
//! compiled once, fail-fast, before any event is processed. A malformed
//! pattern is a configuration error, never a per-event error.

use crate::config::DlpRuleConfig;
use crate::dlp::DataClassification;
use crate::error::{Result, VigilError};
use crate::scoring::Confidence;
use regex::Regex;

/// A compiled detection rule
#[derive(Debug, Clone)]
pub struct DlpRule {
    /// Stable rule identifier, reported as `pattern` on each hit
    pub id: String,
    pub classification: DataClassification,
    pub regex: Regex,
    pub confidence: Confidence,
    pub enabled: bool,
}

/// Compile rule configurations into executable rules, preserving order
///
/// Fails on the first malformed pattern with the offending rule id.
pub fn compile_rules(configs: &[DlpRuleConfig]) -> Result<Vec<DlpRule>> {
    configs
        .iter()
        .map(|cfg| {
            let regex = Regex::new(&cfg.pattern).map_err(|e| VigilError::InvalidRule {
                rule_id: cfg.id.clone(),
                message: e.to_string(),
            })?;
            Ok(DlpRule {
                id: cfg.id.clone(),
                classification: cfg.classification,
                regex,
                confidence: cfg.confidence,
                enabled: cfg.enabled,
            })
        })
        .collect()
}

fn rule(
    id: &str,
    classification: DataClassification,
    pattern: &str,
    confidence: Confidence,
) -> DlpRuleConfig {
    DlpRuleConfig {
        id: id.to_string(),
        classification,
        pattern: pattern.to_string(),
        confidence,
        enabled: true,
    }
}

/// Builtin rule set, ordered by classification severity
pub fn default_rules() -> Vec<DlpRuleConfig> {
    use DataClassification::*;

    vec![
        rule(
            "password_assignment",
            Credentials,
            r#"(?i)(password|passwd|pwd)\s*[:=]\s*\S+"#,
            Confidence::High,
        ),
        rule(
            "api_key_assignment",
            Credentials,
            r#"(?i)(api[_-]?key|secret[_-]?key|access[_-]?token)\s*[:=]\s*['"]?[A-Za-z0-9_\-]{8,}"#,
            Confidence::High,
        ),
        rule(
            "aws_access_key",
            Credentials,
            r"\bAKIA[0-9A-Z]{16}\b",
            Confidence::High,
        ),
        rule(
            "private_key_header",
            Credentials,
            r"-----BEGIN (?:RSA |EC |OPENSSH )?PRIVATE KEY-----",
            Confidence::High,
        ),
        rule(
            "bearer_token",
            Credentials,
            r"(?i)bearer\s+[A-Za-z0-9\-_.~+/]{20,}",
            Confidence::Medium,
        ),
        rule(
            "credit_card",
            Financial,
            r"\b(?:4\d{3}|5[1-5]\d{2}|3[47]\d{2}|6011)[ -]?\d{4}[ -]?\d{4}[ -]?\d{2,4}\b",
            Confidence::High,
        ),
        rule(
            "iban",
            Financial,
            r"\b[A-Z]{2}\d{2}[A-Z0-9]{12,30}\b",
            Confidence::Medium,
        ),
        rule(
            "ssn",
            Pii,
            r"\b\d{3}-\d{2}-\d{4}\b",
            Confidence::High,
        ),
        rule(
            "email_address",
            Pii,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            Confidence::Medium,
        ),
        rule(
            "us_phone",
            Pii,
            r"\b(?:\+1[ .-]?)?\(?\d{3}\)?[ .-]\d{3}[ .-]\d{4}\b",
            Confidence::Low,
        ),
        rule(
            "medical_record_number",
            Health,
            r"(?i)\b(mrn|medical record(?: number)?)\s*[:#]?\s*\d{6,10}\b",
            Confidence::Medium,
        ),
        rule(
            "icd10_code",
            Health,
            r"\b[A-TV-Z]\d{2}\.\d{1,4}\b",
            Confidence::Low,
        ),
        rule(
            "confidential_marker",
            Internal,
            r"(?i)\b(confidential|internal use only|do not distribute)\b",
            Confidence::Medium,
        ),
        rule(
            "source_code",
            Code,
            r"\b(?:function\s+\w+\s*\(|def\s+\w+\s*\(|fn\s+\w+\s*\(|class\s+\w+\s*[({:])",
            Confidence::Low,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_compile() {
        let rules = compile_rules(&default_rules()).unwrap();
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|r| r.enabled));
    }

    #[test]
    fn test_malformed_pattern_is_load_error() {
        let configs = vec![rule(
            "broken",
            DataClassification::Credentials,
            r"(unclosed",
            Confidence::High,
        )];
        let err = compile_rules(&configs).unwrap_err();
        match err {
            VigilError::InvalidRule { rule_id, .. } => assert_eq!(rule_id, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rule_order_preserved() {
        let rules = compile_rules(&default_rules()).unwrap();
        assert_eq!(rules[0].id, "password_assignment");
        assert_eq!(rules[0].classification, DataClassification::Credentials);
    }
}
