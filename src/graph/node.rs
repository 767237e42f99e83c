//! Typed graph nodes
//!
//! Node ids follow the `"{type}:{key}"` convention; the id constructor is the
//! only way to build one, so two entity types sharing a name can never
//! collide.

use crate::dlp::DataClassification;
use crate::scoring::{Confidence, DomainRiskFactors, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Entity type of a graph node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Domain,
    AiProvider,
    Extension,
    User,
    DataType,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Domain => "domain",
            NodeType::AiProvider => "ai_provider",
            NodeType::Extension => "extension",
            NodeType::User => "user",
            NodeType::DataType => "data_type",
        }
    }
}

/// Build the globally unique id for a node
pub fn node_id(node_type: NodeType, key: &str) -> String {
    format!("{}:{}", node_type.as_str(), key)
}

/// Domain node metadata, seeded from the services list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainMetadata {
    pub has_login: bool,
    pub has_privacy_policy: bool,
    pub has_terms_of_service: bool,
    #[serde(rename = "isNRD")]
    pub is_nrd: bool,
    #[serde(default)]
    pub nrd_confidence: Option<Confidence>,
    pub is_typosquat: bool,
    #[serde(default)]
    pub typosquat_confidence: Option<Confidence>,
    pub cookie_count: u64,
    pub session_cookie_count: u64,
    /// Running CSP violation count; feeds full recomputes but each violation
    /// bumps the score by a flat +5 when it arrives
    pub csp_violation_count: u64,
}

impl DomainMetadata {
    /// Risk factors derived from the stored flags
    pub fn risk_factors(&self) -> DomainRiskFactors {
        DomainRiskFactors {
            is_nrd: self.is_nrd,
            nrd_confidence: self.nrd_confidence,
            is_typosquat: self.is_typosquat,
            typosquat_confidence: self.typosquat_confidence,
            has_login: self.has_login,
            has_privacy_policy: self.has_privacy_policy,
            extension_request_count: 0,
            csp_violation_count: self.csp_violation_count,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProviderMetadata {
    pub prompt_count: u64,
    /// Distinct model names seen in prompts to this provider
    pub models: BTreeSet<String>,
    /// Token-estimate proxy: accumulated prompt text length
    pub estimated_tokens: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    pub extension_id: String,
    #[serde(default)]
    pub extension_name: Option<String>,
    pub request_count: u64,
    /// Distinct domains this extension has reached
    pub domains: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeMetadata {
    pub classification: DataClassification,
    pub occurrences: u64,
    /// Distinct domains that leaked this classification
    pub domains: BTreeSet<String>,
}

/// Per-type node metadata, discriminated the same way as the node itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeMetadata {
    Domain(DomainMetadata),
    AiProvider(AiProviderMetadata),
    Extension(ExtensionMetadata),
    User {},
    DataType(DataTypeMetadata),
}

impl NodeMetadata {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeMetadata::Domain(_) => NodeType::Domain,
            NodeMetadata::AiProvider(_) => NodeType::AiProvider,
            NodeMetadata::Extension(_) => NodeType::Extension,
            NodeMetadata::User {} => NodeType::User,
            NodeMetadata::DataType(_) => NodeType::DataType,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainMetadata> {
        match self {
            NodeMetadata::Domain(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_domain_mut(&mut self) -> Option<&mut DomainMetadata> {
        match self {
            NodeMetadata::Domain(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_extension(&self) -> Option<&ExtensionMetadata> {
        match self {
            NodeMetadata::Extension(m) => Some(m),
            _ => None,
        }
    }
}

/// One node of the security graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub metadata: NodeMetadata,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Epoch milliseconds
    pub first_seen: i64,
    pub last_seen: i64,
}

impl GraphNode {
    pub fn new(node_type: NodeType, key: &str, label: String, metadata: NodeMetadata, timestamp: i64) -> Self {
        Self {
            id: node_id(node_type, key),
            node_type,
            label,
            metadata,
            risk_score: 0.0,
            risk_level: RiskLevel::Info,
            first_seen: timestamp,
            last_seen: timestamp,
        }
    }

    /// Set the score and rederive the level, keeping the invariant
    pub fn set_risk(&mut self, score: f64) {
        self.risk_score = score.clamp(0.0, 100.0);
        self.risk_level = RiskLevel::from_score(self.risk_score);
    }

    /// Advance `last_seen` (never backwards)
    pub fn touch(&mut self, timestamp: i64) {
        if timestamp > self.last_seen {
            self.last_seen = timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_convention() {
        assert_eq!(node_id(NodeType::Domain, "example.com"), "domain:example.com");
        assert_eq!(node_id(NodeType::DataType, "credentials"), "data_type:credentials");
    }

    #[test]
    fn test_no_cross_type_collisions() {
        // Same key, different types
        assert_ne!(
            node_id(NodeType::Domain, "openai"),
            node_id(NodeType::AiProvider, "openai")
        );
    }

    #[test]
    fn test_set_risk_keeps_level_invariant() {
        let mut node = GraphNode::new(
            NodeType::Domain,
            "a.com",
            "a.com".to_string(),
            NodeMetadata::Domain(DomainMetadata::default()),
            1000,
        );
        node.set_risk(85.0);
        assert_eq!(node.risk_level, RiskLevel::Critical);
        node.set_risk(150.0);
        assert_eq!(node.risk_score, 100.0);
        node.set_risk(-10.0);
        assert_eq!(node.risk_score, 0.0);
        assert_eq!(node.risk_level, RiskLevel::Info);
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let mut node = GraphNode::new(
            NodeType::User,
            "u1",
            "u1".to_string(),
            NodeMetadata::User {},
            1000,
        );
        node.touch(500);
        assert_eq!(node.last_seen, 1000);
        node.touch(2000);
        assert_eq!(node.last_seen, 2000);
    }
}
