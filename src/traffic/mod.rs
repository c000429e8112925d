mod dedup;
mod edge;
mod events;
mod graph;
mod merge;
mod node;
mod parse;
mod range;
mod scale;
mod source;

pub use dedup::{EdgeKey, IdentityLedger};
pub use events::{TimeWindow, event_list, parse_timestamp, snapshot_from_events};
pub use graph::{CanonicalEdge, CanonicalNode, EdgeKind, MergedGraph, NodeClass};
pub use merge::{merge, merge_snapshots};
pub use node::{attributed_class, paired_class};
pub use parse::{
    AttributedEdge, AttributedNode, Endpoint, PairedEdge, PairedNode, RawEdge, RawFormat,
    RawNode, RawSnapshot, parse_input,
};
pub use range::{Metric, MetricRange, MetricRanges, collect_ranges};
pub use scale::{LinearScale, scale};
pub use source::{STDIN_PATH, read_document, read_snapshot_sequence};
