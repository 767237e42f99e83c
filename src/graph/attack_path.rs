//! Rule-based attack-path mining
//!
//! Not a general shortest-path search: two fixed detection rules scan the
//! finished graph for exfiltration and extension-harvesting shapes. Paths
//! are ranked by risk-level priority and truncated to the top 10.

use crate::graph::{EdgeMetadata, EdgeType, GraphEdge, GraphNode, NodeMetadata};
use crate::scoring::RiskLevel;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Maximum number of paths retained after ranking
const MAX_PATHS: usize = 10;

/// Maximum nodes in a single path
const MAX_PATH_NODES: usize = 6;

/// An ordered chain of nodes/edges representing a plausible exploitation route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackPath {
    /// Deterministic id derived from the member entities
    pub id: String,
    pub name: String,
    pub description: String,
    /// Node ids in chain order, at most 6
    pub nodes: Vec<String>,
    /// Edge ids in chain order
    pub edges: Vec<String>,
    pub total_risk_score: f64,
    pub risk_level: RiskLevel,
}

/// Scan the graph for high-risk chains
pub fn mine_attack_paths(
    nodes: &AHashMap<String, GraphNode>,
    edges: &AHashMap<String, GraphEdge>,
) -> Vec<AttackPath> {
    let mut paths = Vec::new();
    paths.extend(exfiltration_paths(nodes, edges));
    paths.extend(harvesting_paths(nodes, edges));

    // Rank by level priority, then score, then id for a stable order
    paths.sort_by(|a, b| {
        b.risk_level
            .priority()
            .cmp(&a.risk_level.priority())
            .then(b.total_risk_score.total_cmp(&a.total_risk_score))
            .then(a.id.cmp(&b.id))
    });
    paths.truncate(MAX_PATHS);
    paths
}

/// Flagged domain sending credentials or PII to an AI provider
fn exfiltration_paths(
    nodes: &AHashMap<String, GraphNode>,
    edges: &AHashMap<String, GraphEdge>,
) -> Vec<AttackPath> {
    let mut paths = Vec::new();

    for node in nodes.values() {
        let flagged = match &node.metadata {
            NodeMetadata::Domain(meta) => meta.is_nrd || meta.is_typosquat,
            _ => false,
        };
        if !flagged {
            continue;
        }

        for edge in edges.values() {
            if edge.source != node.id || edge.edge_type != EdgeType::AiPrompt {
                continue;
            }
            let sensitive = match &edge.metadata {
                EdgeMetadata::AiPrompt {
                    has_credentials,
                    has_pii,
                    ..
                } => *has_credentials || *has_pii,
                _ => false,
            };
            if !sensitive {
                continue;
            }

            let provider_label = nodes
                .get(&edge.target)
                .map(|n| n.label.clone())
                .unwrap_or_else(|| edge.target.clone());
            paths.push(AttackPath {
                id: format!("exfiltration:{}->{}", node.id, edge.target),
                name: "Suspicious Domain Data Exfiltration".to_string(),
                description: format!(
                    "Flagged domain {} sends sensitive data to AI provider {}",
                    node.label, provider_label
                ),
                nodes: vec![node.id.clone(), edge.target.clone()],
                edges: vec![edge.id.clone()],
                total_risk_score: node.risk_score + edge.risk_score,
                risk_level: RiskLevel::Critical,
            });
        }
    }

    paths
}

/// Extension fanning out across many domains or an unusual request volume
fn harvesting_paths(
    nodes: &AHashMap<String, GraphNode>,
    edges: &AHashMap<String, GraphEdge>,
) -> Vec<AttackPath> {
    let mut paths = Vec::new();

    for node in nodes.values() {
        let harvesting = match node.metadata.as_extension() {
            Some(meta) => meta.domains.len() > 10 || meta.request_count > 100,
            None => false,
        };
        if !harvesting {
            continue;
        }

        let mut outgoing: Vec<&GraphEdge> =
            edges.values().filter(|e| e.source == node.id).collect();
        if outgoing.len() <= 5 {
            continue;
        }
        outgoing.sort_by(|a, b| a.id.cmp(&b.id));

        let edge_count = outgoing.len();
        let mut path_nodes = vec![node.id.clone()];
        let mut path_edges = Vec::new();
        for edge in outgoing.iter().take(MAX_PATH_NODES - 1) {
            path_nodes.push(edge.target.clone());
            path_edges.push(edge.id.clone());
        }

        paths.push(AttackPath {
            id: format!("harvesting:{}", node.id),
            name: "Extension Data Harvesting".to_string(),
            description: format!(
                "Extension {} reaches {} targets across the graph",
                node.label, edge_count
            ),
            nodes: path_nodes,
            edges: path_edges,
            total_risk_score: (edge_count as f64 * 5.0).min(100.0),
            risk_level: if edge_count > 20 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            },
        });
    }

    paths
}
