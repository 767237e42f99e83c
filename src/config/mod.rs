//! Configuration management for Vigil
//!
//! The engine consumes configuration, it does not own policy: typosquat
//! heuristics, DLP rules, and trust thresholds are all declared here and
//! validated before any event is processed.

use crate::dlp::DataClassification;
use crate::error::{Result, VigilError};
use crate::scoring::Confidence;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(rename = "_meta", default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub typosquat: TyposquatConfig,
    #[serde(default)]
    pub dlp: DlpConfig,
    #[serde(default)]
    pub trust: TrustThresholds,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            schema_version: "1.0.0".to_string(),
            created_at: current_timestamp(),
            last_modified: current_timestamp(),
        }
    }
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Typosquat heuristics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TyposquatConfig {
    pub enabled: bool,
    /// Heuristic score [0,100] above which a domain is flagged
    pub heuristic_threshold: f64,
    /// Seconds a cached verdict stays valid in the capture layer
    pub cache_expiry: u64,
    pub detect_japanese_homoglyphs: bool,
    pub warn_on_punycode: bool,
}

impl Default for TyposquatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heuristic_threshold: 50.0,
            cache_expiry: 3600,
            detect_japanese_homoglyphs: true,
            warn_on_punycode: true,
        }
    }
}

/// One DLP rule declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlpRuleConfig {
    pub id: String,
    pub classification: DataClassification,
    pub pattern: String,
    pub confidence: Confidence,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// DLP detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlpConfig {
    pub enabled: bool,
    pub alert_on_detection: bool,
    pub block_on_high_risk: bool,
    /// Ordered rule set; defaults to the builtin rules
    #[serde(default = "crate::dlp::default_rules")]
    pub rules: Vec<DlpRuleConfig>,
}

impl Default for DlpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alert_on_detection: true,
            block_on_high_risk: false,
            rules: crate::dlp::default_rules(),
        }
    }
}

/// Trust-level thresholds, distinct from the fixed risk-level thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustThresholds {
    /// Score at or above which an origin is trusted
    pub trusted: f64,
    /// Score at or above which an origin is conditionally trusted
    pub conditional: f64,
}

impl Default for TrustThresholds {
    fn default() -> Self {
        Self {
            trusted: 80.0,
            conditional: 50.0,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VigilError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| VigilError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: EngineConfig = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration (including DLP rule compilation)
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| VigilError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: VIGIL_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("VIGIL_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        let invalid_bool = || VigilError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as boolean", value),
        };
        let invalid_number = || VigilError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as number", value),
        };

        match path {
            "TYPOSQUAT__ENABLED" => {
                self.typosquat.enabled = value.parse().map_err(|_| invalid_bool())?;
            }
            "TYPOSQUAT__HEURISTIC_THRESHOLD" => {
                self.typosquat.heuristic_threshold = value.parse().map_err(|_| invalid_number())?;
            }
            "TYPOSQUAT__WARN_ON_PUNYCODE" => {
                self.typosquat.warn_on_punycode = value.parse().map_err(|_| invalid_bool())?;
            }
            "DLP__ENABLED" => {
                self.dlp.enabled = value.parse().map_err(|_| invalid_bool())?;
            }
            "DLP__BLOCK_ON_HIGH_RISK" => {
                self.dlp.block_on_high_risk = value.parse().map_err(|_| invalid_bool())?;
            }
            "TRUST__TRUSTED" => {
                self.trust.trusted = value.parse().map_err(|_| invalid_number())?;
            }
            "TRUST__CONDITIONAL" => {
                self.trust.conditional = value.parse().map_err(|_| invalid_number())?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VigilError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("vigil").join("config.toml"))
    }
}
