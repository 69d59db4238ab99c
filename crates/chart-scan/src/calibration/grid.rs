//! Grid location from edge projection profiles.
//!
//! A row (column) profile sums, for every row (column), the edge magnitudes
//! above [`GridOptions::edge_threshold`]. Printed gridlines show up as
//! strong peaks once the profile is smoothed. The grid rectangle spans the
//! first to the last accepted peak on each axis.

use crate::buffer::GrayBuffer;

use super::points::GridRect;

/// Tuning for grid and reference-line search.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Edge magnitude a pixel must exceed to count.
    pub edge_threshold: u8,
    /// Moving-average window applied to each profile.
    pub smoothing_window: usize,
    /// A peak must exceed this multiple of the profile mean.
    pub peak_factor: f64,
    /// Minimum distance between two accepted peaks.
    pub min_peak_separation: usize,
    /// Percentage printed on the upper reference line.
    pub upper_reference: f64,
    /// Percentage printed on the lower reference line.
    pub lower_reference: f64,
    /// Fraction of the grid width a reference row must cover with edges.
    pub reference_coverage: f64,
    /// Qualifying rows closer than this are merged into one line.
    pub group_distance: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            edge_threshold: 30,
            smoothing_window: 20,
            peak_factor: 1.5,
            min_peak_separation: 20,
            upper_reference: 70.0,
            lower_reference: 50.0,
            reference_coverage: 0.5,
            group_distance: 5,
        }
    }
}

impl GridOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn edge_threshold(mut self, threshold: u8) -> Self {
        self.edge_threshold = threshold;
        self
    }

    #[inline]
    pub fn smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window.max(1);
        self
    }

    #[inline]
    pub fn peak_factor(mut self, factor: f64) -> Self {
        self.peak_factor = factor;
        self
    }

    #[inline]
    pub fn min_peak_separation(mut self, separation: usize) -> Self {
        self.min_peak_separation = separation;
        self
    }

    /// Percentages printed on the two reference lines, upper first.
    #[inline]
    pub fn reference_percentages(mut self, upper: f64, lower: f64) -> Self {
        self.upper_reference = upper;
        self.lower_reference = lower;
        self
    }
}

/// A local maximum of a smoothed profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub value: f64,
}

/// Outcome of the grid search. `rect` is `None` when either axis produced
/// fewer than two peaks.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearch {
    pub rect: Option<GridRect>,
    pub row_peaks: Vec<Peak>,
    pub column_peaks: Vec<Peak>,
}

/// Per-row sum of edge magnitudes above `threshold`.
pub fn row_profile(edges: &GrayBuffer, threshold: u8) -> Vec<f64> {
    (0..edges.height())
        .map(|y| {
            edges
                .row(y)
                .iter()
                .filter(|&&m| m > threshold)
                .map(|&m| m as f64)
                .sum()
        })
        .collect()
}

/// Per-column sum of edge magnitudes above `threshold`.
pub fn column_profile(edges: &GrayBuffer, threshold: u8) -> Vec<f64> {
    let mut profile = vec![0.0; edges.width()];
    for y in 0..edges.height() {
        for (x, &m) in edges.row(y).iter().enumerate() {
            if m > threshold {
                profile[x] += m as f64;
            }
        }
    }
    profile
}

/// Centred moving average; the window is clipped at both ends.
pub fn smooth(profile: &[f64], window: usize) -> Vec<f64> {
    let n = profile.len();
    let window = window.max(1);
    let half = window / 2;

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in profile {
        prefix.push(prefix[prefix.len() - 1] + v);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + window - half).min(n);
            (prefix[hi] - prefix[lo]) / (hi - lo) as f64
        })
        .collect()
}

/// Local maxima above `factor` x mean, at least `min_separation` apart.
///
/// Flat-topped maxima report the centre of the plateau. When two peaks are
/// closer than `min_separation` the stronger survives. Peaks are returned
/// in index order.
pub fn find_peaks(profile: &[f64], factor: f64, min_separation: usize) -> Vec<Peak> {
    let n = profile.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = profile.iter().sum::<f64>() / n as f64;
    if mean <= 0.0 {
        return Vec::new();
    }
    let threshold = factor * mean;

    let mut candidates = Vec::new();
    let mut i = 0;
    while i < n {
        let v = profile[i];
        let mut end = i;
        while end + 1 < n && profile[end + 1] == v {
            end += 1;
        }
        let rises = i == 0 || profile[i - 1] < v;
        let falls = end + 1 == n || profile[end + 1] < v;
        if rises && falls && v > threshold {
            candidates.push(Peak {
                index: (i + end) / 2,
                value: v,
            });
        }
        i = end + 1;
    }

    // Strongest first; ties keep the earlier index.
    candidates.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.index.cmp(&b.index)));
    let mut accepted: Vec<Peak> = Vec::new();
    for peak in candidates {
        if accepted
            .iter()
            .all(|p| p.index.abs_diff(peak.index) >= min_separation)
        {
            accepted.push(peak);
        }
    }
    accepted.sort_by_key(|p| p.index);
    accepted
}

/// Locate the plot rectangle in an edge map.
pub fn locate_grid(edges: &GrayBuffer, options: &GridOptions) -> GridSearch {
    let peaks = |profile: Vec<f64>| {
        find_peaks(
            &smooth(&profile, options.smoothing_window),
            options.peak_factor,
            options.min_peak_separation,
        )
    };
    let row_peaks = peaks(row_profile(edges, options.edge_threshold));
    let column_peaks = peaks(column_profile(edges, options.edge_threshold));

    let rect = match (
        row_peaks.first(),
        row_peaks.last(),
        column_peaks.first(),
        column_peaks.last(),
    ) {
        (Some(top), Some(bottom), Some(left), Some(right))
            if row_peaks.len() >= 2 && column_peaks.len() >= 2 =>
        {
            Some(GridRect {
                left: left.index as f64,
                top: top.index as f64,
                right: right.index as f64,
                bottom: bottom.index as f64,
            })
        }
        _ => None,
    };

    GridSearch {
        rect,
        row_peaks,
        column_peaks,
    }
}
