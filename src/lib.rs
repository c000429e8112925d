//! Merges time-windowed network traffic graph snapshots into one deduplicated
//! node/edge set styled for a force-directed renderer.
//!
//! Two raw record layouts are understood: IDS events keyed by `src_ip` /
//! `dest_ip` with per-endpoint `tags`, and graph API records keyed by `id` or
//! `source` / `target` with an `attributes` object. Edge widths are scaled from
//! traffic metrics observed across the whole input.

pub mod config;
pub mod traffic;
mod util;

pub use config::{AlertWidth, StyleConfig};
pub use traffic::{
    CanonicalEdge, CanonicalNode, EdgeKind, MergedGraph, NodeClass, TimeWindow, merge,
    merge_snapshots, snapshot_from_events,
};
