use log::{debug, info, warn};
use serde_json::Value;

use crate::config::StyleConfig;

use super::dedup::IdentityLedger;
use super::edge::EdgeNormalizer;
use super::graph::MergedGraph;
use super::node::NodeNormalizer;
use super::parse::{RawSnapshot, parse_input};
use super::range::{Metric, collect_ranges};

/// Merges a raw snapshot (or array of snapshots) into one styled graph.
///
/// Never fails: malformed input is logged and yields an empty graph.
pub fn merge(input: &Value, style: &StyleConfig) -> MergedGraph {
    match parse_input(input) {
        Ok(snapshots) => merge_snapshots(&snapshots, style),
        Err(error) => {
            warn!("discarding malformed graph input: {error:#}");
            MergedGraph::default()
        }
    }
}

/// Merges already classified snapshots in order; the first occurrence of an
/// identity wins.
///
/// A `style` that fails [`StyleConfig::validate`] is replaced by the default.
pub fn merge_snapshots(snapshots: &[RawSnapshot], style: &StyleConfig) -> MergedGraph {
    let fallback;
    let style = match style.validate() {
        Ok(()) => style,
        Err(error) => {
            warn!("invalid style config, using defaults: {error:#}");
            fallback = StyleConfig::default();
            &fallback
        }
    };

    let ranges = collect_ranges(snapshots, &Metric::ALL);
    for metric in Metric::ALL {
        let range = ranges.get(metric);
        if range.is_observed() {
            debug!("{} range: {} ..= {}", metric.label(), range.min, range.max);
        }
    }

    let nodes = NodeNormalizer::new(style);
    let edges = EdgeNormalizer::new(style, &ranges);
    let mut ledger = IdentityLedger::new();
    let mut merged = MergedGraph::default();

    for snapshot in snapshots {
        for node in &snapshot.nodes {
            nodes.emit(node, &mut ledger, &mut merged.nodes);
        }
        for edge in &snapshot.edges {
            edges.emit(edge, &mut ledger, &mut merged.edges);
        }
    }

    let orphans = merged.orphan_endpoints();
    if !orphans.is_empty() {
        debug!(
            "{} edge endpoint(s) have no node record: {}",
            orphans.len(),
            orphans.join(", ")
        );
    }

    info!(
        "merged {} snapshot(s) into {} nodes and {} edges",
        snapshots.len(),
        merged.node_count(),
        merged.edge_count()
    );

    merged
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::traffic::graph::NodeClass;

    #[test]
    fn ledger_state_does_not_leak_between_merges() {
        let style = StyleConfig::default();
        let input = json!({
            "nodes": [{"id": "a", "attributes": {}}],
            "edges": [{"source": "a", "target": "b", "attributes": {}}]
        });

        let first = merge(&input, &style);
        let second = merge(&input, &style);

        assert_eq!(first, second);
        assert_eq!(second.node_count(), 1);
        assert_eq!(second.edge_count(), 1);
    }

    #[test]
    fn nodes_are_not_created_for_edge_endpoints() {
        let merged = merge(
            &json!({
                "nodes": [],
                "edges": [{"src_ip": "10.0.0.1", "dest_ip": "8.8.8.8", "event_type": "flow"}]
            }),
            &StyleConfig::default(),
        );

        assert!(merged.nodes.is_empty());
        assert_eq!(merged.edge_count(), 1);
        assert_eq!(merged.orphan_endpoints(), vec!["10.0.0.1", "8.8.8.8"]);
    }

    #[test]
    fn formats_can_be_mixed_across_snapshots() {
        let merged = merge(
            &json!([
                {
                    "nodes": [{"src_ip": "10.0.0.1", "dest_ip": "8.8.8.8",
                               "tags": {"src_ip": ["suspicious"], "dest_ip": []}}],
                    "edges": []
                },
                {
                    "nodes": [{"id": "8.8.8.8", "attributes": {"ip": "8.8.8.8"}},
                              {"id": "172.20.0.5", "attributes": {"ip": "172.20.0.5"}}],
                    "edges": []
                }
            ]),
            &StyleConfig::default(),
        );

        let classes = merged
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node.class))
            .collect::<Vec<_>>();
        assert_eq!(
            classes,
            vec![
                ("10.0.0.1", NodeClass::Suspicious),
                ("8.8.8.8", NodeClass::Default),
                ("172.20.0.5", NodeClass::Internal),
            ]
        );
    }

    #[test]
    fn invalid_style_falls_back_to_defaults() {
        let mut style = StyleConfig::default();
        style.nodes.size = 0.0;
        style.edges.min_width = -4.0;
        let input = json!({
            "nodes": [{"id": "a", "attributes": {}}],
            "edges": [{"source": "a", "target": "b", "attributes": {}}]
        });

        let merged = merge(&input, &style);

        assert_eq!(merged, merge(&input, &StyleConfig::default()));
        assert_eq!(merged.nodes[0].size, 30.0);
        assert_eq!(merged.edges[0].width, 1.0);
    }

    #[test]
    fn malformed_snapshot_discards_whole_merge() {
        let merged = merge(
            &json!([
                {"nodes": [{"id": "a", "attributes": {}}], "edges": []},
                {"nodes": "oops", "edges": []}
            ]),
            &StyleConfig::default(),
        );

        assert!(merged.is_empty());
    }
}
