//! Derived graph statistics
//!
//! Always recomputed wholesale from the node/edge set — never patched
//! incrementally during event dispatch, so stats can never drift from the
//! graph content.

use crate::graph::{AttackPath, EdgeType, GraphEdge, GraphNode, NodeType};
use crate::scoring::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregates over the full graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
    /// Node risk-level histogram
    pub risk_distribution: BTreeMap<RiskLevel, usize>,
    /// Ranked attack paths, mined after stats aggregation
    pub top_attack_paths: Vec<AttackPath>,
}

impl GraphStats {
    /// One full pass over all nodes and edges
    pub fn compute<'a>(
        nodes: impl Iterator<Item = &'a GraphNode>,
        edges: impl Iterator<Item = &'a GraphEdge>,
    ) -> Self {
        let mut stats = GraphStats::default();

        for node in nodes {
            stats.total_nodes += 1;
            *stats.nodes_by_type.entry(node.node_type).or_insert(0) += 1;
            *stats.risk_distribution.entry(node.risk_level).or_insert(0) += 1;
        }
        for edge in edges {
            stats.total_edges += 1;
            *stats.edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }

        stats
    }
}
