//! In-memory entity graph with JSON snapshot persistence
//!
//! Nodes and edges live in hash maps keyed by their deterministic ids, so
//! replaying the same events always lands on the same entities. Snapshots
//! serialize with sorted node/edge arrays; statistics are always recomputed
//! on load and never trusted from the snapshot.

use crate::error::{Result, VigilError};
use crate::graph::{
    edge_id, mine_attack_paths, node_id, EdgeType, GraphEdge, GraphNode, GraphStats, NodeMetadata,
    NodeType,
};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The correlated security graph
#[derive(Debug, Clone, Default)]
pub struct SecurityGraph {
    nodes: AHashMap<String, GraphNode>,
    edges: AHashMap<String, GraphEdge>,
    /// Epoch milliseconds of the last rebuild
    last_updated: i64,
    stats: GraphStats,
}

/// Wire shape of a persisted graph
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// Informational only; always recomputed on load, so it may be absent
    #[serde(default)]
    stats: GraphStats,
    last_updated: i64,
}

impl SecurityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-create a node, then advance its `last_seen`
    ///
    /// The metadata closure only runs when the node does not exist yet, so
    /// repeated events never reset accumulated state.
    pub fn ensure_node(
        &mut self,
        node_type: NodeType,
        key: &str,
        label: &str,
        metadata: impl FnOnce() -> NodeMetadata,
        timestamp: i64,
    ) -> &mut GraphNode {
        let id = node_id(node_type, key);
        let node = self
            .nodes
            .entry(id)
            .or_insert_with(|| GraphNode::new(node_type, key, label.to_string(), metadata(), timestamp));
        node.touch(timestamp);
        node
    }

    /// Fetch-or-create an edge; an existing edge gains one weight unit
    pub fn upsert_edge(
        &mut self,
        edge_type: EdgeType,
        source: &str,
        target: &str,
        timestamp: i64,
    ) -> &mut GraphEdge {
        let id = edge_id(source, edge_type, target);
        let edge = self
            .edges
            .entry(id)
            .and_modify(|e| e.weight += 1)
            .or_insert_with(|| GraphEdge::new(edge_type, source, target, timestamp));
        edge.touch(timestamp);
        edge
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    pub fn set_last_updated(&mut self, timestamp: i64) {
        self.last_updated = timestamp;
    }

    /// Recompute statistics and re-mine attack paths from the current
    /// node/edge set
    pub fn refresh(&mut self) {
        let mut stats = GraphStats::compute(self.nodes.values(), self.edges.values());
        stats.top_attack_paths = mine_attack_paths(&self.nodes, &self.edges);
        self.stats = stats;
    }

    /// Serialize the graph as a snapshot with deterministic ordering
    pub fn to_json(&self) -> Result<String> {
        let mut nodes: Vec<GraphNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<GraphEdge> = self.edges.values().cloned().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));

        let snapshot = Snapshot {
            nodes,
            edges,
            stats: self.stats.clone(),
            last_updated: self.last_updated,
        };
        serde_json::to_string(&snapshot).map_err(|source| VigilError::Snapshot {
            source,
            context: "serializing graph snapshot".to_string(),
        })
    }

    /// Load a graph from a snapshot
    ///
    /// Stats and attack paths are recomputed from the loaded nodes and
    /// edges; the persisted values are ignored. A snapshot that fails to
    /// decode is a hard error and the caller must rebuild from events.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|source| VigilError::Snapshot {
                source,
                context: "decoding graph snapshot".to_string(),
            })?;

        let mut graph = Self {
            nodes: snapshot
                .nodes
                .into_iter()
                .map(|n| (n.id.clone(), n))
                .collect(),
            edges: snapshot
                .edges
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            last_updated: snapshot.last_updated,
            stats: GraphStats::default(),
        };
        graph.refresh();
        Ok(graph)
    }
}
