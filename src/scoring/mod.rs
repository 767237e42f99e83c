//! Risk and trust scoring
//!
//! Two independent, pure scoring functions used by the graph builder:
//! - Domain-factor risk: turns observed domain signals into a bounded
//!   [0,100] score with fixed risk-level thresholds
//! - Zero-trust: starts at 100 and applies named deductions/additions with
//!   configurable (and deliberately separate) level thresholds
//!
//! All functions are total and never panic.

mod risk;
mod trust;

pub use risk::{calculate_risk_score, Confidence, DomainRiskFactors, RiskLevel};
pub use trust::{compute_trust_score, TrustFactor, TrustInput, TrustLevel, TrustScore};
