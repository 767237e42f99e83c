//! Sensitive-data (DLP) detection
//!
//! This module provides:
//! - Configuration-driven detection rules compiled fail-fast at load time
//! - A detector that classifies text spans, masks matched content, and
//!   deduplicates overlapping hits
//! - A manager layering per-rule enable/disable, custom rules, a blocking
//!   policy, and a per-analysis risk rollup
//!
//! All rule patterns are plain `regex` patterns; the regex crate's
//! linear-time matching keeps detection bounded on adversarial input.

mod detector;
mod manager;
mod rules;

pub use detector::{mask_text, DataClassification, DlpDetector, SensitiveDataResult};
pub use manager::{DlpAnalysis, DlpManager};
pub use rules::{compile_rules, default_rules, DlpRule};
