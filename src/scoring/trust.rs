//! Zero-trust scoring algorithm
//!
//! Starts from full trust (100) and applies named, capped deductions for each
//! observed risk signal, then additions for positive signals. Every applied
//! factor is recorded so callers can explain a verdict. Level thresholds are
//! configurable and intentionally separate from [`super::RiskLevel`]'s fixed
//! thresholds.

use crate::config::TrustThresholds;
use crate::scoring::Confidence;
use serde::{Deserialize, Serialize};

/// Trust verdict for an origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Trusted,
    Conditional,
    Untrusted,
}

/// A single named score adjustment, for verdict transparency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustFactor {
    /// Stable factor name (e.g. "nrd", "csp_violations", "authenticated")
    pub name: String,
    /// Signed score delta actually applied (post-cap)
    pub delta: f64,
}

/// Observations feeding the trust computation
///
/// All fields are caller-supplied; the function derives nothing on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustInput {
    pub is_nrd: bool,
    pub nrd_confidence: Option<Confidence>,
    pub is_typosquat: bool,
    pub typosquat_confidence: Option<Confidence>,
    pub csp_violation_count: u64,
    /// Risk score [0,100] of the riskiest extension touching the origin
    pub extension_risk_score: f64,
    /// Count of suspicious request/DOM patterns observed
    pub suspicious_pattern_count: u64,
    /// DNS-over-HTTPS traffic detected from the origin
    pub doh_detected: bool,
    /// Enterprise policy violations attributed to the origin
    pub policy_violation_count: u64,
    /// User completed an authentication flow on the origin
    pub authenticated: bool,
    /// Request originated from an enterprise-managed device
    pub managed_device: bool,
}

/// Trust computation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustScore {
    /// Final score, clamped to [0,100]
    pub score: f64,
    pub level: TrustLevel,
    /// Factors actually applied, in application order
    pub factors: Vec<TrustFactor>,
}

fn weight(confidence: Option<Confidence>) -> f64 {
    confidence.map(|c| c.weight()).unwrap_or(0.0)
}

/// Compute a zero-trust score for one origin
///
/// Deduction ladder: NRD -30*confidence, typosquat -40*confidence, CSP
/// violations -5 each (cap -25), extension risk -0.5*score (cap -20),
/// suspicious patterns -10 each (cap -30), DoH -15 flat, policy violations
/// -15 each (cap -45). Additions: authenticated +10, managed device +15.
pub fn compute_trust_score(input: &TrustInput, thresholds: &TrustThresholds) -> TrustScore {
    let mut score = 100.0;
    let mut factors = Vec::new();

    let mut apply = |name: &str, delta: f64, score: &mut f64| {
        if delta != 0.0 {
            *score += delta;
            factors.push(TrustFactor {
                name: name.to_string(),
                delta,
            });
        }
    };

    if input.is_nrd {
        apply("nrd", -30.0 * weight(input.nrd_confidence), &mut score);
    }
    if input.is_typosquat {
        apply(
            "typosquat",
            -40.0 * weight(input.typosquat_confidence),
            &mut score,
        );
    }
    if input.csp_violation_count > 0 {
        apply(
            "csp_violations",
            -(input.csp_violation_count as f64 * 5.0).min(25.0),
            &mut score,
        );
    }
    if input.extension_risk_score > 0.0 {
        apply(
            "extension_risk",
            -(input.extension_risk_score * 0.5).min(20.0),
            &mut score,
        );
    }
    if input.suspicious_pattern_count > 0 {
        apply(
            "suspicious_patterns",
            -(input.suspicious_pattern_count as f64 * 10.0).min(30.0),
            &mut score,
        );
    }
    if input.doh_detected {
        apply("doh_detected", -15.0, &mut score);
    }
    if input.policy_violation_count > 0 {
        apply(
            "policy_violations",
            -(input.policy_violation_count as f64 * 15.0).min(45.0),
            &mut score,
        );
    }
    if input.authenticated {
        apply("authenticated", 10.0, &mut score);
    }
    if input.managed_device {
        apply("managed_device", 15.0, &mut score);
    }

    let score = score.clamp(0.0, 100.0);
    let level = if score >= thresholds.trusted {
        TrustLevel::Trusted
    } else if score >= thresholds.conditional {
        TrustLevel::Conditional
    } else {
        TrustLevel::Untrusted
    };

    TrustScore {
        score,
        level,
        factors,
    }
}
