use super::range::MetricRange;

pub const DEFAULT_MIN_WIDTH: f64 = 1.0;
pub const DEFAULT_MAX_WIDTH: f64 = 10.0;

/// Maps a metric value linearly from its observed range onto `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub lo: f64,
    pub hi: f64,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            lo: DEFAULT_MIN_WIDTH,
            hi: DEFAULT_MAX_WIDTH,
        }
    }
}

impl LinearScale {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn apply(&self, value: f64, range: MetricRange) -> f64 {
        if range.is_degenerate() || !value.is_finite() {
            return self.lo;
        }

        let span = range.max - range.min;
        let t = if span.is_finite() {
            (value - range.min) / span
        } else {
            // Halving keeps ranges wider than f64::MAX representable.
            (value / 2.0 - range.min / 2.0) / (range.max / 2.0 - range.min / 2.0)
        };

        let width = self.lo + t.clamp(0.0, 1.0) * (self.hi - self.lo);
        if width.is_finite() { width } else { self.lo }
    }
}

pub fn scale(value: f64, min: f64, max: f64) -> f64 {
    LinearScale::default().apply(value, MetricRange { min, max })
}
