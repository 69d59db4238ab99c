//! Final analysis result and its assembly from per-column scans.

use crate::calibration::CalibrationPoints;
use crate::detect::{ColumnScan, StrategyKind};
use crate::mapping::PercentageMapper;
use crate::preprocess::Scale;
use crate::topics::Topic;

use super::overlay::Overlay;

/// Outcome for one topic. Coordinates are in source-image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScore {
    pub topic: Topic,
    pub y: Option<f64>,
    /// `None` means no evidence was found, which is distinct from 0.
    pub percentage: Option<f64>,
    pub range_top: Option<f64>,
    pub range_bottom: Option<f64>,
    /// Strategy that produced the score.
    pub strategy: Option<StrategyKind>,
}

impl TopicScore {
    fn undetected(topic: Topic) -> Self {
        TopicScore {
            topic,
            y: None,
            percentage: None,
            range_top: None,
            range_bottom: None,
            strategy: None,
        }
    }

    #[inline]
    pub fn is_detected(&self) -> bool {
        self.percentage.is_some()
    }
}

/// One point of debug output.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPoint {
    pub topic: Topic,
    pub x: f64,
    pub y: f64,
    pub score: Option<f64>,
    pub strategy: StrategyKind,
    /// False for rejected low-confidence candidates.
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugData {
    pub points: Vec<DebugPoint>,
    pub overlay: Overlay,
}

/// Terminal output of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Source image width.
    pub width: usize,
    /// Source image height.
    pub height: usize,
    /// Exactly one entry per topic, in [`Topic::ALL`] order.
    pub topics: Vec<TopicScore>,
    /// Calibration used, in source coordinates.
    pub calibration: CalibrationPoints,
    pub debug: Option<DebugData>,
}

impl AnalysisResult {
    pub fn get(&self, topic: Topic) -> &TopicScore {
        &self.topics[topic.index()]
    }

    /// `(topic, percentage)` pairs in chart order.
    pub fn scores(&self) -> impl Iterator<Item = (Topic, Option<f64>)> + '_ {
        self.topics.iter().map(|t| (t.topic, t.percentage))
    }

    pub fn detected_count(&self) -> usize {
        self.topics.iter().filter(|t| t.is_detected()).count()
    }
}

/// Merges column scans into an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler {
    include_debug: bool,
}

impl ResultAssembler {
    pub fn new(include_debug: bool) -> Self {
        Self { include_debug }
    }

    /// Assemble scans made against `calibration` in working coordinates.
    ///
    /// Scans may arrive in any order; missing topics are reported as
    /// undetected. `scale` maps working coordinates back to the
    /// `width` x `height` source.
    pub fn assemble(
        &self,
        mut scans: Vec<ColumnScan>,
        calibration: &CalibrationPoints,
        width: usize,
        height: usize,
        scale: Scale,
    ) -> AnalysisResult {
        scans.sort_by_key(|s| s.topic.index());
        let mapper = PercentageMapper::from(calibration);

        let mut topics: Vec<TopicScore> =
            Topic::ALL.into_iter().map(TopicScore::undetected).collect();
        let mut points = Vec::new();
        let mut bands = Vec::new();

        for scan in &scans {
            let slot = &mut topics[scan.topic.index()];
            let x = calibration.x_position(scan.topic) * scale.x;

            if let Some(band) = scan.band {
                slot.range_top = Some(band.top as f64 * scale.y);
                slot.range_bottom = Some(band.bottom as f64 * scale.y);
                if let Some(roi) = scan.roi {
                    bands.push([
                        roi.x_start as f64 * scale.x,
                        band.top as f64 * scale.y,
                        roi.x_end as f64 * scale.x,
                        (band.bottom + 1) as f64 * scale.y,
                    ]);
                }
            }

            if let Some(probe) = scan.accepted {
                if let Some(y) = probe.y {
                    let percentage = mapper.percentage(y as f64);
                    slot.y = Some(y as f64 * scale.y);
                    slot.percentage = Some(percentage);
                    slot.strategy = Some(probe.kind);
                    points.push(DebugPoint {
                        topic: scan.topic,
                        x,
                        y: y as f64 * scale.y,
                        score: Some(percentage),
                        strategy: probe.kind,
                        accepted: true,
                    });
                }
            }
            for probe in scan.candidates() {
                if let Some(y) = probe.y {
                    points.push(DebugPoint {
                        topic: scan.topic,
                        x,
                        y: y as f64 * scale.y,
                        score: Some(mapper.percentage(y as f64)),
                        strategy: probe.kind,
                        accepted: false,
                    });
                }
            }
        }

        let source_calibration = if scale.is_identity() {
            calibration.clone()
        } else {
            calibration.scaled(scale.x, scale.y)
        };

        let debug = self.include_debug.then(|| DebugData {
            overlay: Overlay::build(width, height, &source_calibration, &points, &bands),
            points,
        });

        AnalysisResult {
            width,
            height,
            topics,
            calibration: source_calibration,
            debug,
        }
    }
}
