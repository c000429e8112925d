use crate::config::{AlertWidth, StyleConfig};

use super::dedup::IdentityLedger;
use super::graph::{CanonicalEdge, EdgeKind};
use super::parse::{RawEdge, RawFormat};
use super::range::{Metric, MetricRanges};
use super::scale::LinearScale;

pub(super) struct EdgeNormalizer<'a> {
    style: &'a StyleConfig,
    ranges: &'a MetricRanges,
    scale: LinearScale,
}

impl<'a> EdgeNormalizer<'a> {
    pub(super) fn new(style: &'a StyleConfig, ranges: &'a MetricRanges) -> Self {
        Self {
            style,
            ranges,
            scale: style.edges.scale(),
        }
    }

    pub(super) fn emit(
        &self,
        edge: &RawEdge,
        ledger: &mut IdentityLedger,
        out: &mut Vec<CanonicalEdge>,
    ) {
        if ledger.admit_edge(edge.source(), edge.target()) {
            out.push(self.normalize(edge));
        }
    }

    fn normalize(&self, edge: &RawEdge) -> CanonicalEdge {
        let kind = edge.kind();
        let color = match kind {
            EdgeKind::Flow => &self.style.palette.flow,
            EdgeKind::Alert => &self.style.palette.alert,
        };

        CanonicalEdge {
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            color: color.clone(),
            width: self.width(edge, kind),
            kind,
            metadata: edge.fields().clone(),
        }
    }

    fn width(&self, edge: &RawEdge, kind: EdgeKind) -> f64 {
        let metric = match (kind, edge.format()) {
            (EdgeKind::Flow, RawFormat::Paired) => Metric::TotalBytes,
            (EdgeKind::Flow, RawFormat::Attributed) => Metric::ClientBytes,
            (EdgeKind::Alert, format) => match self.style.edges.alert_width(format) {
                AlertWidth::Fixed { width } => return width,
                AlertWidth::ScaledByCount => Metric::EventCount,
            },
        };

        match metric.read(edge) {
            Some(value) => self.scale.apply(value, self.ranges.get(metric)),
            None => self.scale.lo,
        }
    }
}
