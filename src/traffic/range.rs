use std::collections::HashMap;

use super::parse::{CLIENT_BYTES_KEYS, RawEdge, RawFormat, RawSnapshot, number};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `bytes_toserver + bytes_toclient` of paired edges.
    TotalBytes,
    /// Client-bound byte count of attributed flow edges.
    ClientBytes,
    EventCount,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Self::TotalBytes, Self::ClientBytes, Self::EventCount];

    pub fn label(self) -> &'static str {
        match self {
            Self::TotalBytes => "bytes_toserver+bytes_toclient",
            Self::ClientBytes => "flow.bytes_toclient",
            Self::EventCount => "count",
        }
    }

    /// Which record format carries this metric; `None` means both.
    pub fn format(self) -> Option<RawFormat> {
        match self {
            Self::TotalBytes => Some(RawFormat::Paired),
            Self::ClientBytes => Some(RawFormat::Attributed),
            Self::EventCount => None,
        }
    }

    pub fn read(self, edge: &RawEdge) -> Option<f64> {
        if self.format().is_some_and(|format| format != edge.format()) {
            return None;
        }

        let fields = edge.fields();
        match self {
            Self::TotalBytes => {
                match (
                    number(fields, "bytes_toserver"),
                    number(fields, "bytes_toclient"),
                ) {
                    (None, None) => None,
                    (server, client) => Some(server.unwrap_or(0.0) + client.unwrap_or(0.0)),
                }
            }
            Self::ClientBytes => CLIENT_BYTES_KEYS
                .iter()
                .find_map(|key| number(fields, key)),
            Self::EventCount => number(fields, "count"),
        }
    }
}

/// Observed bounds of one metric. Starts at `(+inf, -inf)` until a value is seen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl Default for MetricRange {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl MetricRange {
    pub fn observe(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn is_observed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// True when the range cannot be divided by: unobserved or a single point.
    pub fn is_degenerate(&self) -> bool {
        !self.is_observed() || self.max <= self.min
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricRanges {
    ranges: HashMap<Metric, MetricRange>,
}

impl MetricRanges {
    /// Unobserved metrics report the sentinel range.
    pub fn get(&self, metric: Metric) -> MetricRange {
        self.ranges.get(&metric).copied().unwrap_or_default()
    }
}

/// Scans every edge of every snapshot once and records min/max per tracked metric.
pub fn collect_ranges(snapshots: &[RawSnapshot], metrics: &[Metric]) -> MetricRanges {
    let mut ranges = metrics
        .iter()
        .map(|metric| (*metric, MetricRange::default()))
        .collect::<HashMap<_, _>>();

    for edge in snapshots.iter().flat_map(|snapshot| &snapshot.edges) {
        for (metric, range) in &mut ranges {
            if let Some(value) = metric.read(edge) {
                range.observe(value);
            }
        }
    }

    MetricRanges { ranges }
}
