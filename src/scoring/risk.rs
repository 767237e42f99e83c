//! Domain-factor risk scoring
//!
//! Additive, capped composition of observed domain signals into a [0,100]
//! score. The score-to-level thresholds are fixed; every node and edge in the
//! graph derives its level through [`RiskLevel::from_score`].

use serde::{Deserialize, Serialize};

/// Risk level derived from a numeric score via fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl RiskLevel {
    /// Map a score to its level: >=80 critical, >=60 high, >=40 medium,
    /// >=20 low, else info
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Critical
        } else if score >= 60.0 {
            RiskLevel::High
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else if score >= 20.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Info
        }
    }

    /// Ordering priority for ranking (critical > high > medium > low > info)
    pub fn priority(&self) -> u8 {
        match self {
            RiskLevel::Critical => 5,
            RiskLevel::High => 4,
            RiskLevel::Medium => 3,
            RiskLevel::Low => 2,
            RiskLevel::Info => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Info => "info",
        }
    }
}

/// Detection confidence reported by upstream collectors
///
/// Absence of a detection is represented as `Option::None` and weighs 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    Unknown,
}

impl Confidence {
    /// Weight applied to confidence-scaled risk contributions
    pub fn weight(&self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.7,
            Confidence::Low => 0.4,
            Confidence::Unknown => 0.1,
        }
    }
}

/// Weight of an optional detection confidence (absent detection weighs 0)
fn confidence_weight(confidence: Option<Confidence>) -> f64 {
    confidence.map(|c| c.weight()).unwrap_or(0.0)
}

/// Observed signals feeding the domain-factor risk score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainRiskFactors {
    /// Domain flagged as newly registered
    pub is_nrd: bool,
    pub nrd_confidence: Option<Confidence>,
    /// Domain flagged as a typosquat
    pub is_typosquat: bool,
    pub typosquat_confidence: Option<Confidence>,
    /// A login form was observed on the domain
    pub has_login: bool,
    /// A privacy policy was discovered
    pub has_privacy_policy: bool,
    /// Requests from browser extensions targeting this domain
    pub extension_request_count: u64,
    /// CSP violations reported for this domain
    pub csp_violation_count: u64,
}

/// Compute the domain-factor risk score, clamped to [0,100]
///
/// NRD and typosquat contributions scale with detection confidence; a login
/// form without a discoverable privacy policy is weighted more heavily than
/// a login form alone. Extension traffic and CSP violations contribute
/// capped increments.
pub fn calculate_risk_score(factors: &DomainRiskFactors) -> f64 {
    let mut score = 0.0;

    if factors.is_nrd {
        score += 40.0 * confidence_weight(factors.nrd_confidence);
    }
    if factors.is_typosquat {
        score += 45.0 * confidence_weight(factors.typosquat_confidence);
    }
    if factors.has_login {
        score += 5.0;
        if !factors.has_privacy_policy {
            score += 10.0;
        }
    }
    score += (factors.extension_request_count as f64 / 2.0).min(10.0);
    score += (factors.csp_violation_count as f64 * 5.0).min(25.0);

    score.clamp(0.0, 100.0)
}
