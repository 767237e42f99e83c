//! Entity correlation graph
//!
//! Nodes are the entities seen in browser activity (domains, AI providers,
//! extensions, users, data types) and edges are the observed relationships
//! between them. [`GraphBuilder`] turns capture-layer inputs into a
//! [`SecurityGraph`]; statistics and attack paths are derived afterwards.

mod attack_path;
mod builder;
mod edge;
mod node;
mod stats;
mod store;

pub use attack_path::{mine_attack_paths, AttackPath};
pub use builder::GraphBuilder;
pub use edge::{edge_id, EdgeMetadata, EdgeType, GraphEdge};
pub use node::{
    node_id, AiProviderMetadata, DataTypeMetadata, DomainMetadata, ExtensionMetadata, GraphNode,
    NodeMetadata, NodeType,
};
pub use stats::GraphStats;
pub use store::SecurityGraph;
