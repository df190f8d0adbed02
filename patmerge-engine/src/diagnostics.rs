//! Diagnostic histograms filled during the pass.
//!
//! Six distributions: siblings per anchor, group size, differing layer,
//! bin delta, window offset and value difference. The first four have fixed
//! binning; the last two pick their range from the data when reported.
//! Nothing here feeds back into the merge.

use patmerge_core::traits::SiblingObserver;
use patmerge_core::types::SiblingCandidate;
use serde::Serialize;

const AUTO_RANGE_BINS: usize = 100;

/// Fixed-range weighted histogram with under/overflow tracking.
/// Bins are half-open `[low, high)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub name: String,
    pub low: f64,
    pub high: f64,
    pub counts: Vec<f64>,
    pub underflow: f64,
    pub overflow: f64,
    /// Number of fills, regardless of weight.
    pub entries: u64,
}

impl Histogram {
    pub fn new(name: impl Into<String>, bins: usize, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            low,
            high,
            counts: vec![0.0; bins.max(1)],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        }
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        self.entries += 1;
        match self.bin_index(x) {
            Ok(bin) => self.counts[bin] += weight,
            Err(Outside::Below) => self.underflow += weight,
            Err(Outside::Above) => self.overflow += weight,
        }
    }

    /// Content of `bin`, 0 outside the range.
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.counts.get(bin).copied().unwrap_or(0.0)
    }

    /// Summed weight inside the range.
    pub fn integral(&self) -> f64 {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    fn bin_index(&self, x: f64) -> Result<usize, Outside> {
        if x.is_nan() || x >= self.high {
            return Err(Outside::Above);
        }
        if x < self.low {
            return Err(Outside::Below);
        }
        let bin = ((x - self.low) / self.bin_width()) as usize;
        Ok(bin.min(self.counts.len() - 1))
    }
}

enum Outside {
    Below,
    Above,
}

/// Histogram whose range is taken from the observed samples.
#[derive(Debug, Clone, Default)]
pub struct AutoHistogram {
    name: String,
    bins: usize,
    samples: Vec<(f64, f64)>,
}

impl AutoHistogram {
    pub fn new(name: impl Into<String>, bins: usize) -> Self {
        Self {
            name: name.into(),
            bins,
            samples: Vec::new(),
        }
    }

    pub fn fill(&mut self, x: f64) {
        self.samples.push((x, 1.0));
    }

    /// Bin the buffered samples over `[min, max]`. The maximum lands in the
    /// last bin; a degenerate range is widened by half a unit on each side.
    pub fn to_histogram(&self) -> Histogram {
        let finite = self.samples.iter().map(|&(x, _)| x).filter(|x| x.is_finite());
        let (mut low, mut high) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if low > high {
            (low, high) = (0.0, 1.0);
        } else if low == high {
            (low, high) = (low - 0.5, high + 0.5);
        }

        let mut hist = Histogram::new(self.name.clone(), self.bins, low, high);
        for &(x, w) in &self.samples {
            if x == high {
                let last = hist.counts.len() - 1;
                hist.entries += 1;
                hist.counts[last] += w;
            } else {
                hist.fill_weighted(x, w);
            }
        }
        hist
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// All histograms of one merge run.
#[derive(Debug, Clone)]
pub struct MergeDiagnostics {
    pub sibling_count: Histogram,
    pub group_size: Histogram,
    pub layer: Histogram,
    pub delta: Histogram,
    pub window_offset: AutoHistogram,
    pub value_difference: AutoHistogram,
}

impl MergeDiagnostics {
    pub fn new(n_layers: usize) -> Self {
        Self {
            sibling_count: Histogram::new("n_siblings", 41, -0.5, 40.5),
            group_size: Histogram::new("n_merged", 8, 0.5, 8.5),
            layer: Histogram::new("layer", n_layers, -0.5, n_layers as f64 - 0.5),
            delta: Histogram::new("delta_ss", 2001, -1000.5, 1000.5),
            window_offset: AutoHistogram::new("delta_n", AUTO_RANGE_BINS),
            value_difference: AutoHistogram::new("delta_value", AUTO_RANGE_BINS),
        }
    }

    /// Materialize every histogram for output.
    pub fn report(&self) -> DiagnosticsReport {
        DiagnosticsReport {
            histograms: vec![
                self.sibling_count.clone(),
                self.group_size.clone(),
                self.layer.clone(),
                self.delta.clone(),
                self.window_offset.to_histogram(),
                self.value_difference.to_histogram(),
            ],
        }
    }
}

impl SiblingObserver for MergeDiagnostics {
    fn single_layer_difference(
        &mut self,
        layer: usize,
        delta: i64,
        anchor_frequency: u32,
        window_offset: i64,
        value_difference: f32,
    ) {
        let weight = f64::from(anchor_frequency);
        self.layer.fill_weighted(layer as f64, weight);
        self.delta.fill_weighted(delta as f64, weight);
        self.window_offset.fill(window_offset as f64);
        self.value_difference.fill(f64::from(value_difference));
    }

    fn siblings_found(&mut self, siblings: &[SiblingCandidate]) {
        self.sibling_count.fill(siblings.len() as f64);
    }

    fn group_recorded(&mut self, size: usize) {
        self.group_size.fill(size as f64);
    }
}

/// Serializable snapshot of the diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    pub histograms: Vec<Histogram>,
}

impl DiagnosticsReport {
    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_histogram_bins_and_overflows() {
        let mut h = Histogram::new("h", 4, 0.0, 4.0);
        h.fill(0.0);
        h.fill(3.99);
        h.fill_weighted(1.5, 2.0);
        h.fill(-0.1);
        h.fill(4.0);
        assert_eq!(h.counts, vec![1.0, 2.0, 0.0, 1.0]);
        assert_eq!(h.underflow, 1.0);
        assert_eq!(h.overflow, 1.0);
        assert_eq!(h.entries, 5);
        assert_eq!(h.integral(), 4.0);
    }

    #[test]
    fn group_size_histogram_centres_on_integers() {
        let mut diagnostics = MergeDiagnostics::new(6);
        for size in [1, 2, 4, 8, 8] {
            diagnostics.group_recorded(size);
        }
        let h = &diagnostics.group_size;
        assert_eq!(h.bin_content(0), 1.0);
        assert_eq!(h.bin_content(1), 1.0);
        assert_eq!(h.bin_content(3), 1.0);
        assert_eq!(h.bin_content(7), 2.0);
    }

    #[test]
    fn single_layer_differences_are_weighted_by_anchor_frequency() {
        let mut diagnostics = MergeDiagnostics::new(6);
        diagnostics.single_layer_difference(2, -1, 5, 3, 0.01);
        assert_eq!(diagnostics.layer.bin_content(2), 5.0);
        assert_eq!(diagnostics.delta.bin_content(999), 5.0);
        assert_eq!(diagnostics.window_offset.len(), 1);
    }

    #[test]
    fn auto_histogram_includes_its_maximum() {
        let mut h = AutoHistogram::new("auto", 10);
        for x in [-5.0, 0.0, 5.0] {
            h.fill(x);
        }
        let hist = h.to_histogram();
        assert_eq!(hist.low, -5.0);
        assert_eq!(hist.high, 5.0);
        assert_eq!(hist.integral(), 3.0);
        assert_eq!(hist.bin_content(9), 1.0);
        assert_eq!(hist.overflow, 0.0);
    }

    #[test]
    fn auto_histogram_handles_degenerate_ranges() {
        let empty = AutoHistogram::new("empty", 10).to_histogram();
        assert_eq!((empty.low, empty.high), (0.0, 1.0));

        let mut flat = AutoHistogram::new("flat", 10);
        flat.fill(2.0);
        flat.fill(2.0);
        let hist = flat.to_histogram();
        assert_eq!((hist.low, hist.high), (1.5, 2.5));
        assert_eq!(hist.integral(), 2.0);
    }

    #[test]
    fn report_lists_all_histograms() {
        let report = MergeDiagnostics::new(6).report();
        assert_eq!(report.histograms.len(), 6);
        assert!(report.histogram("n_siblings").is_some());
        assert!(report.histogram("delta_value").is_some());
    }
}
