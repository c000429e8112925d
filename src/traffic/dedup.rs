use std::collections::HashSet;

/// Ordered `(source, target)` pair identifying an edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
}

impl EdgeKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Identities already emitted during one merge. First admission wins.
#[derive(Debug, Default)]
pub struct IdentityLedger {
    nodes: HashSet<String>,
    edges: HashSet<EdgeKey>,
}

impl IdentityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit_node(&mut self, id: &str) -> bool {
        if self.nodes.contains(id) {
            return false;
        }
        self.nodes.insert(id.to_string())
    }

    pub fn admit_edge(&mut self, source: &str, target: &str) -> bool {
        self.edges.insert(EdgeKey::new(source, target))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
