//! DLP manager: rule lifecycle, blocking policy, and per-analysis rollup

use crate::config::{DlpConfig, DlpRuleConfig};
use crate::dlp::{compile_rules, DataClassification, DlpDetector, SensitiveDataResult};
use crate::error::Result;
use crate::scoring::{Confidence, RiskLevel};
use serde::{Deserialize, Serialize};

/// Outcome of analyzing one text payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlpAnalysis {
    pub results: Vec<SensitiveDataResult>,
    /// Rolled-up severity; `None` when nothing matched
    pub risk_level: Option<RiskLevel>,
    /// True when the blocking policy flagged any result
    pub blocked: bool,
}

/// Extended detector with rule management and an optional blocking policy
pub struct DlpManager {
    detector: DlpDetector,
    block_on_high_risk: bool,
}

impl DlpManager {
    /// Build a manager from configuration, compiling all rules fail-fast
    pub fn from_config(config: &DlpConfig) -> Result<Self> {
        Ok(Self {
            detector: DlpDetector::new(compile_rules(&config.rules)?),
            block_on_high_risk: config.block_on_high_risk,
        })
    }

    pub fn detector(&self) -> &DlpDetector {
        &self.detector
    }

    /// Enable or disable a rule by id; returns false if the id is unknown
    pub fn set_rule_enabled(&mut self, rule_id: &str, enabled: bool) -> bool {
        let mut found = false;
        for rule in self.detector.rules_mut() {
            if rule.id == rule_id {
                rule.enabled = enabled;
                found = true;
            }
        }
        found
    }

    /// Register a custom rule, compiled fail-fast
    pub fn add_rule(&mut self, config: &DlpRuleConfig) -> Result<()> {
        let compiled = compile_rules(std::slice::from_ref(config))?;
        for rule in compiled {
            self.detector.push_rule(rule);
        }
        Ok(())
    }

    /// Analyze one text payload: detect, apply the blocking policy, roll up
    pub fn analyze(&self, text: &str) -> DlpAnalysis {
        let mut results = self.detector.detect(text);
        let mut blocked = false;

        if self.block_on_high_risk {
            for result in results.iter_mut() {
                if result.confidence == Confidence::High
                    && matches!(
                        result.classification,
                        DataClassification::Credentials | DataClassification::Financial
                    )
                {
                    result.blocked = true;
                    blocked = true;
                }
            }
        }

        let risk_level = Self::rollup(&results);
        DlpAnalysis {
            results,
            risk_level,
            blocked,
        }
    }

    /// Per-analysis severity rollup
    ///
    /// Critical for high-confidence credentials; high for any other
    /// high-confidence hit; medium for medium-confidence; low otherwise.
    fn rollup(results: &[SensitiveDataResult]) -> Option<RiskLevel> {
        if results.is_empty() {
            return None;
        }
        let high_creds = results.iter().any(|r| {
            r.confidence == Confidence::High && r.classification == DataClassification::Credentials
        });
        if high_creds {
            return Some(RiskLevel::Critical);
        }
        if results.iter().any(|r| r.confidence == Confidence::High) {
            return Some(RiskLevel::High);
        }
        if results.iter().any(|r| r.confidence == Confidence::Medium) {
            return Some(RiskLevel::Medium);
        }
        Some(RiskLevel::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DlpConfig;

    fn manager(block: bool) -> DlpManager {
        let config = DlpConfig {
            block_on_high_risk: block,
            ..Default::default()
        };
        DlpManager::from_config(&config).unwrap()
    }

    #[test]
    fn test_rollup_critical_for_credentials() {
        let analysis = manager(false).analyze("password=hunter2");
        assert_eq!(analysis.risk_level, Some(RiskLevel::Critical));
        assert!(!analysis.blocked);
    }

    #[test]
    fn test_rollup_high_for_financial() {
        let analysis = manager(false).analyze("card: 4111 1111 1111 1111");
        assert_eq!(analysis.risk_level, Some(RiskLevel::High));
    }

    #[test]
    fn test_rollup_medium_for_email() {
        let analysis = manager(false).analyze("reach me at bob@example.com");
        assert_eq!(analysis.risk_level, Some(RiskLevel::Medium));
    }

    #[test]
    fn test_rollup_none_for_clean_text() {
        let analysis = manager(false).analyze("hello world");
        assert_eq!(analysis.risk_level, None);
        assert!(analysis.results.is_empty());
    }

    #[test]
    fn test_blocking_policy() {
        let analysis = manager(true).analyze("password=hunter2");
        assert!(analysis.blocked);
        assert!(analysis.results.iter().any(|r| r.blocked));

        // medium-confidence PII does not trigger blocking
        let analysis = manager(true).analyze("bob@example.com");
        assert!(!analysis.blocked);
        assert!(analysis.results.iter().all(|r| !r.blocked));
    }

    #[test]
    fn test_blocking_disabled_by_default() {
        let analysis = manager(false).analyze("password=hunter2");
        assert!(!analysis.blocked);
    }

    #[test]
    fn test_disable_rule() {
        let mut mgr = manager(false);
        assert!(mgr.set_rule_enabled("password_assignment", false));
        let analysis = mgr.analyze("password: Secret123!!");
        assert!(analysis
            .results
            .iter()
            .all(|r| r.pattern != "password_assignment"));
    }

    #[test]
    fn test_unknown_rule_id() {
        let mut mgr = manager(false);
        assert!(!mgr.set_rule_enabled("no_such_rule", false));
    }

    #[test]
    fn test_custom_rule() {
        let mut mgr = manager(false);
        mgr.add_rule(&DlpRuleConfig {
            id: "ticket_id".to_string(),
            classification: DataClassification::Internal,
            pattern: r"\bTICKET-\d{4}\b".to_string(),
            confidence: Confidence::Medium,
            enabled: true,
        })
        .unwrap();

        let analysis = mgr.analyze("see TICKET-1234 for details");
        assert_eq!(analysis.results.len(), 1);
        assert_eq!(analysis.results[0].pattern, "ticket_id");
    }

    #[test]
    fn test_custom_rule_bad_pattern_fails() {
        let mut mgr = manager(false);
        let err = mgr.add_rule(&DlpRuleConfig {
            id: "bad".to_string(),
            classification: DataClassification::Internal,
            pattern: r"(oops".to_string(),
            confidence: Confidence::Low,
            enabled: true,
        });
        assert!(err.is_err());
    }
}
