//! Reference-line search inside a located grid, and extrapolation of two
//! reference lines to the 0% and 100% positions.

use crate::buffer::GrayBuffer;
use crate::topics::Topic;

use super::grid::GridOptions;
use super::points::{CalibrationPoints, CalibrationSource, DetectedLine, GridRect, ReferenceLine};

/// Integer bounds of `grid` clipped to the edge map, inclusive.
fn pixel_bounds(grid: &GridRect, edges: &GrayBuffer) -> Option<(usize, usize, usize, usize)> {
    if edges.width() == 0 || edges.height() == 0 {
        return None;
    }
    let clip = |v: f64, max: usize| (v.round().max(0.0) as usize).min(max);
    let left = clip(grid.left, edges.width() - 1);
    let right = clip(grid.right, edges.width() - 1);
    let top = clip(grid.top, edges.height() - 1);
    let bottom = clip(grid.bottom, edges.height() - 1);
    (left <= right && top <= bottom).then_some((left, top, right, bottom))
}

/// Horizontal lines crossing the grid.
///
/// A row qualifies when edge pixels cover at least
/// [`GridOptions::reference_coverage`] of the grid width and its mean edge
/// magnitude across that width exceeds 1.5x the edge threshold. Qualifying
/// rows within [`GridOptions::group_distance`] are merged and averaged.
pub fn find_line_candidates(
    edges: &GrayBuffer,
    grid: &GridRect,
    options: &GridOptions,
) -> Vec<DetectedLine> {
    let Some((left, top, right, bottom)) = pixel_bounds(grid, edges) else {
        return Vec::new();
    };
    let span = (right - left + 1) as f64;
    let threshold = options.edge_threshold;

    let mut rows: Vec<(usize, f64)> = Vec::new();
    for y in top..=bottom {
        let slice = &edges.row(y)[left..=right];
        let count = slice.iter().filter(|&&m| m > threshold).count() as f64;
        let mean = slice.iter().map(|&m| m as f64).sum::<f64>() / span;
        if count >= options.reference_coverage * span && mean > 1.5 * threshold as f64 {
            rows.push((y, mean));
        }
    }

    let mut lines = Vec::new();
    let mut group: Vec<(usize, f64)> = Vec::new();
    let flush = |group: &mut Vec<(usize, f64)>, lines: &mut Vec<DetectedLine>| {
        if group.is_empty() {
            return;
        }
        let n = group.len() as f64;
        lines.push(DetectedLine {
            y: group.iter().map(|(y, _)| *y as f64).sum::<f64>() / n,
            strength: group.iter().map(|(_, m)| m).sum::<f64>() / n,
            percentage: None,
        });
        group.clear();
    };
    for row in rows {
        if let Some(&(last, _)) = group.last() {
            if row.0 - last > options.group_distance {
                flush(&mut group, &mut lines);
            }
        }
        group.push(row);
    }
    flush(&mut group, &mut lines);
    lines
}

/// Pick the upper and lower reference lines, returning their indices into
/// `lines` (which must be sorted by y).
///
/// Prefers lines whose relative position within the grid lies in
/// `[0.2, 0.8]`; otherwise takes the lines nearest one and two thirds down.
pub fn choose_references(lines: &[DetectedLine], grid: &GridRect) -> Option<(usize, usize)> {
    if lines.len() < 2 {
        return None;
    }
    let height = grid.height();
    let inner: Vec<usize> = (0..lines.len())
        .filter(|&i| {
            let rel = if height > 0.0 {
                (lines[i].y - grid.top) / height
            } else {
                -1.0
            };
            (0.2..=0.8).contains(&rel)
        })
        .collect();
    if inner.len() >= 2 {
        return Some((inner[0], inner[1]));
    }

    let nearest = |target: f64, skip: Option<usize>| {
        (0..lines.len())
            .filter(|&i| Some(i) != skip)
            .min_by(|&a, &b| {
                (lines[a].y - target)
                    .abs()
                    .total_cmp(&(lines[b].y - target).abs())
            })
    };
    let upper = nearest(grid.top + height / 3.0, None)?;
    let lower = nearest(grid.top + 2.0 * height / 3.0, Some(upper))?;
    if lines[upper].y <= lines[lower].y {
        Some((upper, lower))
    } else {
        Some((lower, upper))
    }
}

/// Linearly extend two reference lines to the 100% and 0% positions.
///
/// Returns `(y_hundred, y_zero)`. `upper` must lie above `lower` and carry
/// the higher percentage.
pub fn extrapolate(upper: ReferenceLine, lower: ReferenceLine) -> (f64, f64) {
    let pixels_per_percent = (lower.y - upper.y) / (upper.percentage - lower.percentage);
    let y_zero = lower.y + pixels_per_percent * lower.percentage;
    let y_hundred = upper.y - pixels_per_percent * (100.0 - upper.percentage);
    (y_hundred, y_zero)
}

/// Build calibration from a grid rectangle.
///
/// Without two usable reference lines the grid's top and bottom edges stand
/// in for 100% and 0%. Column positions split the grid evenly.
pub fn calibrate_from_grid(
    edges: &GrayBuffer,
    grid: GridRect,
    source: CalibrationSource,
    options: &GridOptions,
) -> CalibrationPoints {
    let mut candidates = find_line_candidates(edges, &grid, options);
    let mut reference_lines = Vec::new();

    let (y_hundred, mut y_zero) = match choose_references(&candidates, &grid) {
        Some((u, l)) if options.upper_reference > options.lower_reference => {
            candidates[u].percentage = Some(options.upper_reference);
            candidates[l].percentage = Some(options.lower_reference);
            let upper = ReferenceLine {
                percentage: options.upper_reference,
                y: candidates[u].y,
            };
            let lower = ReferenceLine {
                percentage: options.lower_reference,
                y: candidates[l].y,
            };
            reference_lines.extend([upper, lower]);
            extrapolate(upper, lower)
        }
        _ => (grid.top, grid.bottom),
    };
    if y_zero <= y_hundred {
        y_zero = y_hundred + 1.0;
    }

    CalibrationPoints {
        y_hundred,
        y_zero,
        x_positions: grid.column_centres(Topic::COUNT),
        reference_lines,
        grid: Some(grid),
        candidates,
        source,
    }
}
