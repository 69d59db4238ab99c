//! End-to-end regression tests for the extraction pipeline.
//!
//! Each test builds a synthetic chart, runs the full [`ScoreExtractor`] and
//! documents what a failure would mean.

use crate::api::{ExtractError, ScoreExtractor};
use crate::buffer::{PixelBuffer, Rgba};
use crate::calibration::{CalibrationMode, CalibrationSource, CalibrationTemplate, GridRect};
use crate::detect::StrategyKind;
use crate::preprocess::PreprocessOptions;
use crate::topics::Topic;

const W: usize = 600;
const H: usize = 300;
const Y_HUNDRED: usize = 60;
const Y_ZERO: usize = 260;
const LIGHT_GRID: Rgba = Rgba::rgb(200, 200, 200);

fn column_x(i: usize) -> usize {
    30 + 60 * i
}

/// Template matching the synthetic layout at scale 1.
fn template() -> CalibrationTemplate {
    CalibrationTemplate::new(
        W as u32,
        H as u32,
        Y_ZERO as f64,
        Y_HUNDRED as f64,
        (0..10).map(|i| column_x(i) as f64).collect(),
    )
    .unwrap()
}

/// Synthetic chart at scale `k`: light gridlines at 0% and 100%, and for
/// each topic with `Some(y)` a black marker segment of half-width 15 at row
/// `y` of the unscaled layout.
fn chart(k: usize, markers: &[Option<usize>; 10]) -> PixelBuffer {
    draw_chart(k, markers, true)
}

/// Markers only, on an otherwise featureless white background.
fn bare_chart(markers: &[Option<usize>; 10]) -> PixelBuffer {
    draw_chart(1, markers, false)
}

fn draw_chart(k: usize, markers: &[Option<usize>; 10], gridlines: bool) -> PixelBuffer {
    PixelBuffer::from_fn(W * k, H * k, |x, y| {
        let (ux, uy) = (x / k, y / k);
        if gridlines && (uy == Y_HUNDRED || uy == Y_ZERO) {
            return LIGHT_GRID;
        }
        for (i, marker) in markers.iter().enumerate() {
            if *marker == Some(uy) && ux.abs_diff(column_x(i)) <= 15 {
                return Rgba::BLACK;
            }
        }
        Rgba::WHITE
    })
}

fn staggered_markers() -> [Option<usize>; 10] {
    std::array::from_fn(|i| Some(80 + 15 * i))
}

// ========================================================================
// Scenario A: a single dark line at 70% across every column
// ========================================================================

/// If this breaks, the darkest-line search or the percentage mapping is
/// wrong: a line 30% of the way down from the 100% line must read as 70.
#[test]
fn test_uniform_line_reads_seventy_everywhere() {
    let y_line = Y_HUNDRED + (3 * (Y_ZERO - Y_HUNDRED)) / 10;
    let image = PixelBuffer::from_fn(W, H, |_, y| match y {
        y if y == y_line => Rgba::BLACK,
        y if y == Y_HUNDRED || y == Y_ZERO => LIGHT_GRID,
        _ => Rgba::WHITE,
    });

    let result = ScoreExtractor::new(CalibrationMode::FixedScaled(template()))
        .extract(&image)
        .unwrap();

    for score in &result.topics {
        let p = score
            .percentage
            .unwrap_or_else(|| panic!("{} undetected", score.topic));
        assert!(
            (p - 70.0).abs() <= 0.5,
            "REGRESSION: {} read {p}, expected 70.0",
            score.topic
        );
    }
}

// ========================================================================
// Scenario B: one blank column stays undetected, the rest are unaffected
// ========================================================================

/// If this breaks, either a featureless column is reporting a spurious
/// score or one topic's failure is bleeding into its neighbours.
#[test]
fn test_blank_column_is_null_and_isolated() {
    let mut markers = staggered_markers();
    markers[Topic::CorporateIssues.index()] = None;
    let image = bare_chart(&markers);

    let result = ScoreExtractor::new(CalibrationMode::FixedScaled(template()))
        .extract(&image)
        .unwrap();

    assert_eq!(result.get(Topic::CorporateIssues).percentage, None);
    assert_eq!(result.get(Topic::CorporateIssues).strategy, None);
    assert_eq!(result.detected_count(), Topic::COUNT - 1);
    for topic in Topic::ALL {
        if let Some(y) = markers[topic.index()] {
            let expected = 100.0 - (y - Y_HUNDRED) as f64 / 2.0;
            let p = result
                .get(topic)
                .percentage
                .unwrap_or_else(|| panic!("{topic} undetected"));
            assert!(
                (p - expected).abs() < 0.05,
                "{topic} read {p}, expected {expected}; a blank neighbour must not matter"
            );
        }
    }
}

/// If this breaks, rows on the calibration lines are being skipped by every
/// strategy: a marker drawn exactly on the 0% line must read as 0.
#[test]
fn test_marker_on_zero_line_reads_zero() {
    let image = PixelBuffer::from_fn(W, H, |_, y| {
        if y == Y_ZERO {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    });

    let result = ScoreExtractor::new(CalibrationMode::FixedScaled(template()))
        .extract(&image)
        .unwrap();

    for score in &result.topics {
        assert_eq!(score.percentage, Some(0.0), "{}", score.topic);
        assert_eq!(score.y, Some(Y_ZERO as f64), "{}", score.topic);
        assert_eq!(score.strategy, Some(StrategyKind::EdgeGradient));
    }
}

// ========================================================================
// Scenario C: grid detection on a chart without a grid
// ========================================================================

/// If this breaks, strict grid mode is silently inventing a grid, or the
/// lenient mode stopped falling back to the fractional rectangle.
#[test]
fn test_missing_grid_strict_and_lenient() {
    let image = PixelBuffer::filled(W, H, Rgba::WHITE);

    let err = ScoreExtractor::new(CalibrationMode::DetectedGrid { strict: true })
        .extract(&image)
        .unwrap_err();
    assert!(matches!(err, ExtractError::GridNotDetected { .. }), "{err}");

    let result = ScoreExtractor::new(CalibrationMode::DetectedGrid { strict: false })
        .extract(&image)
        .unwrap();
    assert_eq!(result.calibration.source, CalibrationSource::GridFallback);
    assert_eq!(result.calibration.grid, Some(GridRect::fallback(W, H)));
    assert_eq!(result.calibration.y_hundred, 75.0);
    assert_eq!(result.calibration.y_zero, 225.0);
    assert_eq!(result.detected_count(), 0);
}

/// If this breaks, a grid with rules on only one axis is being accepted:
/// horizontal rules alone give row peaks but no column peaks.
#[test]
fn test_one_axis_grid_strict_and_lenient() {
    let image = PixelBuffer::from_fn(400, 300, |x, y| {
        if [50, 110, 150, 250].contains(&y) && (40..=360).contains(&x) {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    });

    let err = ScoreExtractor::new(CalibrationMode::DetectedGrid { strict: true })
        .extract(&image)
        .unwrap_err();
    assert_eq!(
        err,
        ExtractError::GridNotDetected {
            row_peaks: 4,
            column_peaks: 0
        }
    );

    let result = ScoreExtractor::new(CalibrationMode::DetectedGrid { strict: false })
        .extract(&image)
        .unwrap();
    assert_eq!(result.calibration.source, CalibrationSource::GridFallback);
    assert_eq!(
        result.calibration.grid,
        Some(GridRect {
            left: 40.0,
            top: 75.0,
            right: 360.0,
            bottom: 225.0
        })
    );
}

/// If this breaks, reference-line extrapolation is off: gridlines at 70%
/// and 50% must reproduce the printed 100% and 0% rows.
#[test]
fn test_detected_grid_extrapolates_reference_lines() {
    // Box from (40, 50) to (360, 250); references at 70% (y=110) and 50% (y=150).
    let image = PixelBuffer::from_fn(400, 300, |x, y| {
        let on_row = [50, 110, 150, 250].contains(&y) && (40..=360).contains(&x);
        let on_col = (x == 40 || x == 360) && (50..=250).contains(&y);
        if on_row || on_col {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    });

    let result = ScoreExtractor::new(CalibrationMode::DetectedGrid { strict: true })
        .extract(&image)
        .unwrap();
    let calibration = &result.calibration;

    assert_eq!(calibration.source, CalibrationSource::DetectedGrid);
    assert_eq!(calibration.reference_lines.len(), 2, "{calibration:?}");
    assert!((calibration.y_hundred - 50.0).abs() <= 1.0, "{calibration:?}");
    assert!((calibration.y_zero - 250.0).abs() <= 1.0, "{calibration:?}");
    assert!(calibration
        .x_positions
        .windows(2)
        .all(|pair| pair[0] <= pair[1]));
}

// ========================================================================
// Determinism, ordering and scale
// ========================================================================

/// If this breaks, some stage depends on hidden state.
#[test]
fn test_idempotent() {
    let image = chart(1, &staggered_markers());
    let extractor = ScoreExtractor::new(CalibrationMode::FixedScaled(template())).debug(true);
    let first = extractor.extract(&image).unwrap();
    let second = extractor.extract(&image).unwrap();
    assert_eq!(first, second);
}

/// If this breaks, results are no longer reported in chart order.
#[test]
fn test_topic_order_is_canonical() {
    let image = chart(1, &staggered_markers());
    for mode in [
        CalibrationMode::FixedScaled(template()),
        CalibrationMode::DetectedGrid { strict: false },
    ] {
        let result = ScoreExtractor::new(mode).extract(&image).unwrap();
        let order: Vec<Topic> = result.topics.iter().map(|t| t.topic).collect();
        assert_eq!(order, Topic::ALL.to_vec());
    }
}

/// If this breaks, template rescaling or a pixel-distance threshold is not
/// scale aware: doubling the image and the template must not move scores.
#[test]
fn test_uniform_scaling_preserves_scores() {
    let markers = staggered_markers();
    let mode = CalibrationMode::FixedScaled(template());

    let small = ScoreExtractor::new(mode.clone())
        .extract(&chart(1, &markers))
        .unwrap();
    let large = ScoreExtractor::new(mode).extract(&chart(2, &markers)).unwrap();

    for topic in Topic::ALL {
        let (a, b) = (small.get(topic).percentage, large.get(topic).percentage);
        let (a, b) = (a.expect("small detected"), b.expect("large detected"));
        assert!((a - b).abs() <= 0.5, "{topic}: {a} vs {b}");
    }
}

/// If this breaks, working-size resampling reports coordinates in the
/// wrong space or loses thin markers.
#[test]
fn test_working_size_reports_source_coordinates() {
    let image = chart(2, &staggered_markers());
    let result = ScoreExtractor::new(CalibrationMode::FixedScaled(template()))
        .preprocess(PreprocessOptions::new().working_size(W as u32, H as u32))
        .extract(&image)
        .unwrap();

    assert_eq!(result.width, 2 * W);
    assert_eq!(result.calibration.y_zero, 2.0 * Y_ZERO as f64);
    let score = result.get(Topic::EthicalAndProfessionalStandards);
    let y = score.y.expect("first column detected");
    assert!((y - 160.0).abs() <= 2.0, "y={y} should be near source row 160");
    let p = score.percentage.expect("first column detected");
    assert!((p - 90.0).abs() <= 1.0, "p={p}");
}

/// If this breaks, some resolved calibration violated y100 < y0.
#[test]
fn test_every_mode_keeps_lines_ordered() {
    let images = [
        PixelBuffer::filled(31, 7, Rgba::WHITE),
        chart(1, &staggered_markers()),
        PixelBuffer::filled(1, 1, Rgba::BLACK),
    ];
    for image in &images {
        for mode in [
            CalibrationMode::default(),
            CalibrationMode::DetectedGrid { strict: false },
        ] {
            let result = ScoreExtractor::new(mode).extract(image).unwrap();
            assert!(
                result.calibration.y_hundred < result.calibration.y_zero,
                "{:?}",
                result.calibration
            );
            for score in &result.topics {
                if let Some(p) = score.percentage {
                    assert!((0.0..=100.0).contains(&p));
                }
            }
        }
    }
}
