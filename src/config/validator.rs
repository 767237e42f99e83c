use crate::config::EngineConfig;
use crate::error::{Result, ValidationError, VigilError};
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &EngineConfig) -> Result<()> {
        let mut errors = Vec::new();

        // Validate schema version
        Self::validate_schema_version(config, &mut errors);

        // Validate typosquat settings
        Self::validate_typosquat(config, &mut errors);

        // Validate DLP rule declarations
        Self::validate_dlp(config, &mut errors);

        // Validate trust thresholds
        Self::validate_trust(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(VigilError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &EngineConfig, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_typosquat(config: &EngineConfig, errors: &mut Vec<ValidationError>) {
        let threshold = config.typosquat.heuristic_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            errors.push(ValidationError::new(
                "typosquat.heuristic_threshold",
                format!("Threshold must be between 0 and 100, got {}", threshold),
            ));
        }
    }

    fn validate_dlp(config: &EngineConfig, errors: &mut Vec<ValidationError>) {
        let mut seen_ids = HashSet::new();
        for rule in &config.dlp.rules {
            if rule.id.is_empty() {
                errors.push(ValidationError::new("dlp.rules", "Rule id cannot be empty"));
                continue;
            }
            if !seen_ids.insert(rule.id.as_str()) {
                errors.push(ValidationError::new(
                    format!("dlp.rules.{}", rule.id),
                    "Duplicate rule id",
                ));
            }
            // Compile-check every pattern so malformed regexes fail at load
            // time, never during event processing
            if let Err(e) = regex::Regex::new(&rule.pattern) {
                errors.push(ValidationError::new(
                    format!("dlp.rules.{}.pattern", rule.id),
                    e.to_string(),
                ));
            }
        }
    }

    fn validate_trust(config: &EngineConfig, errors: &mut Vec<ValidationError>) {
        let trusted = config.trust.trusted;
        let conditional = config.trust.conditional;

        if !(0.0..=100.0).contains(&trusted) {
            errors.push(ValidationError::new(
                "trust.trusted",
                format!("Threshold must be between 0 and 100, got {}", trusted),
            ));
        }
        if !(0.0..=100.0).contains(&conditional) {
            errors.push(ValidationError::new(
                "trust.conditional",
                format!("Threshold must be between 0 and 100, got {}", conditional),
            ));
        }
        if conditional >= trusted {
            errors.push(ValidationError::new(
                "trust.conditional",
                format!(
                    "Conditional threshold ({}) must be below trusted threshold ({})",
                    conditional, trusted
                ),
            ));
        }
    }
}
