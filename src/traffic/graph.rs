use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    Critical,
    Suspicious,
    Watched,
    Internal,
    External,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Flow,
    Alert,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanonicalNode {
    pub id: String,
    pub label: String,
    pub color: String,
    pub size: f64,
    pub symbol: String,
    pub class: NodeClass,
    pub metadata: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanonicalEdge {
    pub source: String,
    pub target: String,
    pub color: String,
    pub width: f64,
    pub kind: EdgeKind,
    pub metadata: Map<String, Value>,
}

/// Deduplicated, styled graph handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MergedGraph {
    pub nodes: Vec<CanonicalNode>,
    pub edges: Vec<CanonicalEdge>,
}

impl MergedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&CanonicalNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&CanonicalEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    /// Edge endpoints with no node of the same id, in first-seen order.
    ///
    /// Nodes are only created from node records, so an edge may point at an
    /// identity the renderer has no node for.
    pub fn orphan_endpoints(&self) -> Vec<&str> {
        let known = self
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        let mut reported = HashSet::new();
        let mut orphans = Vec::new();

        for edge in &self.edges {
            for endpoint in [edge.source.as_str(), edge.target.as_str()] {
                if !known.contains(endpoint) && reported.insert(endpoint) {
                    orphans.push(endpoint);
                }
            }
        }

        orphans
    }
}
