use serde_json::{Map, Value};

use crate::config::StyleConfig;
use crate::util::{annotated_label, private_ipv4};

use super::dedup::IdentityLedger;
use super::graph::{CanonicalNode, NodeClass};
use super::parse::{AttributedNode, Endpoint, PairedNode, RawNode};

pub(super) struct NodeNormalizer<'a> {
    style: &'a StyleConfig,
}

impl<'a> NodeNormalizer<'a> {
    pub(super) fn new(style: &'a StyleConfig) -> Self {
        Self { style }
    }

    /// Pushes the canonical node(s) of `node` whose identity the ledger admits.
    pub(super) fn emit(
        &self,
        node: &RawNode,
        ledger: &mut IdentityLedger,
        out: &mut Vec<CanonicalNode>,
    ) {
        match node {
            RawNode::Paired(paired) => {
                for endpoint in [Endpoint::Source, Endpoint::Destination] {
                    let (ip, _) = paired.endpoint(endpoint);
                    if ledger.admit_node(ip) {
                        out.push(self.paired(paired, endpoint));
                    }
                }
            }
            RawNode::Attributed(attributed) => {
                if ledger.admit_node(&attributed.id) {
                    out.push(self.attributed(attributed));
                }
            }
        }
    }

    fn paired(&self, node: &PairedNode, endpoint: Endpoint) -> CanonicalNode {
        let (ip, tags) = node.endpoint(endpoint);
        let class = paired_class(tags);

        let mut metadata = Map::new();
        metadata.insert("role".to_string(), Value::from(endpoint.key()));
        metadata.insert("tags".to_string(), Value::from(tags.to_vec()));

        CanonicalNode {
            id: ip.to_string(),
            label: ip.to_string(),
            color: self.color(class).to_string(),
            size: self.style.nodes.size,
            symbol: self.style.nodes.symbol.clone(),
            class,
            metadata,
        }
    }

    fn attributed(&self, node: &AttributedNode) -> CanonicalNode {
        let nodes = &self.style.nodes;
        let class = attributed_class(node, &nodes.watched_hosts);
        let ip_type = node.attribute_str("ip_type").filter(|_| nodes.annotate_type);

        CanonicalNode {
            id: node.id.clone(),
            label: annotated_label(node.ip(), ip_type),
            color: self.color(class).to_string(),
            size: nodes.size,
            symbol: node
                .attribute_str("symbol")
                .unwrap_or(nodes.symbol.as_str())
                .to_string(),
            class,
            metadata: node.attributes.clone(),
        }
    }

    fn color(&self, class: NodeClass) -> &str {
        let palette = &self.style.palette;
        match class {
            NodeClass::Critical => palette.critical.as_str(),
            NodeClass::Suspicious => palette.suspicious.as_str(),
            NodeClass::Watched => palette.watched.as_str(),
            NodeClass::Internal => palette.internal.as_str(),
            NodeClass::External => palette.external.as_str(),
            NodeClass::Default => palette.default.as_str(),
        }
    }
}

pub fn paired_class(tags: &[String]) -> NodeClass {
    if tags.iter().any(|tag| tag == "critical") {
        NodeClass::Critical
    } else if tags.iter().any(|tag| tag == "suspicious") {
        NodeClass::Suspicious
    } else {
        NodeClass::Default
    }
}

pub fn attributed_class(node: &AttributedNode, watched_hosts: &[String]) -> NodeClass {
    let ip = node.ip();
    if watched_hosts
        .iter()
        .any(|host| host == ip || host == &node.id)
    {
        return NodeClass::Watched;
    }

    let internal = private_ipv4(ip)
        .unwrap_or_else(|| node.attribute_str("ip_type") == Some("internal"));
    if internal {
        NodeClass::Internal
    } else {
        NodeClass::External
    }
}
