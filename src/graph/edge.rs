//! Typed graph edges

use crate::dlp::DataClassification;
use crate::scoring::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Relationship type of a graph edge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Requests,
    SendsData,
    Authenticates,
    Redirects,
    HostsCookie,
    AiPrompt,
    ExtensionRequest,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Requests => "requests",
            EdgeType::SendsData => "sends_data",
            EdgeType::Authenticates => "authenticates",
            EdgeType::Redirects => "redirects",
            EdgeType::HostsCookie => "hosts_cookie",
            EdgeType::AiPrompt => "ai_prompt",
            EdgeType::ExtensionRequest => "extension_request",
        }
    }
}

/// Build the globally unique id for an edge
pub fn edge_id(source: &str, edge_type: EdgeType, target: &str) -> String {
    format!("{}:{}:{}", source, edge_type.as_str(), target)
}

/// Per-type edge metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeMetadata {
    #[serde(rename_all = "camelCase")]
    Requests {
        request_count: u64,
        methods: BTreeSet<String>,
    },
    #[serde(rename_all = "camelCase")]
    SendsData { data_types: BTreeSet<DataClassification> },
    Authenticates {},
    Redirects {},
    HostsCookie {},
    #[serde(rename_all = "camelCase")]
    AiPrompt {
        data_types: BTreeSet<DataClassification>,
        has_credentials: bool,
        #[serde(rename = "hasPII")]
        has_pii: bool,
    },
    #[serde(rename_all = "camelCase")]
    ExtensionRequest {
        request_count: u64,
        methods: BTreeSet<String>,
    },
}

impl EdgeMetadata {
    /// Default metadata for a freshly created edge of the given type
    pub fn empty_for(edge_type: EdgeType) -> Self {
        match edge_type {
            EdgeType::Requests => EdgeMetadata::Requests {
                request_count: 0,
                methods: BTreeSet::new(),
            },
            EdgeType::SendsData => EdgeMetadata::SendsData {
                data_types: BTreeSet::new(),
            },
            EdgeType::Authenticates => EdgeMetadata::Authenticates {},
            EdgeType::Redirects => EdgeMetadata::Redirects {},
            EdgeType::HostsCookie => EdgeMetadata::HostsCookie {},
            EdgeType::AiPrompt => EdgeMetadata::AiPrompt {
                data_types: BTreeSet::new(),
                has_credentials: false,
                has_pii: false,
            },
            EdgeType::ExtensionRequest => EdgeMetadata::ExtensionRequest {
                request_count: 0,
                methods: BTreeSet::new(),
            },
        }
    }
}

/// One edge of the security graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub source: String,
    pub target: String,
    /// Occurrence count; increases monotonically, one per producing event
    pub weight: u64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub metadata: EdgeMetadata,
    /// Epoch milliseconds
    pub first_seen: i64,
    pub last_seen: i64,
}

impl GraphEdge {
    pub fn new(edge_type: EdgeType, source: &str, target: &str, timestamp: i64) -> Self {
        Self {
            id: edge_id(source, edge_type, target),
            edge_type,
            source: source.to_string(),
            target: target.to_string(),
            weight: 1,
            risk_score: 0.0,
            risk_level: RiskLevel::Info,
            metadata: EdgeMetadata::empty_for(edge_type),
            first_seen: timestamp,
            last_seen: timestamp,
        }
    }

    /// Set the score and rederive the level, keeping the invariant
    pub fn set_risk(&mut self, score: f64) {
        self.risk_score = score.clamp(0.0, 100.0);
        self.risk_level = RiskLevel::from_score(self.risk_score);
    }

    /// Raise the score to at least `floor`; never lowers it
    pub fn elevate_risk(&mut self, floor: f64) {
        if self.risk_score < floor {
            self.set_risk(floor);
        }
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
    fn test_edge_id_convention() {
        assert_eq!(
            edge_id("domain:a.com", EdgeType::AiPrompt, "ai_provider:openai"),
            "domain:a.com:ai_prompt:ai_provider:openai"
        );
    }

    #[test]
    fn test_elevate_never_lowers() {
        let mut edge = GraphEdge::new(EdgeType::AiPrompt, "domain:a.com", "ai_provider:o", 1);
        edge.elevate_risk(50.0);
        assert_eq!(edge.risk_score, 50.0);
        assert_eq!(edge.risk_level, RiskLevel::Medium);
        edge.elevate_risk(30.0);
        assert_eq!(edge.risk_score, 50.0);
        edge.elevate_risk(70.0);
        assert_eq!(edge.risk_score, 70.0);
    }

    #[test]
    fn test_new_edge_weight_is_one() {
        let edge = GraphEdge::new(EdgeType::Requests, "domain:a.com", "domain:b.com", 1);
        assert_eq!(edge.weight, 1);
        assert_eq!(edge.risk_level, RiskLevel::Info);
    }
}
