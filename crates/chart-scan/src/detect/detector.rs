use std::fmt;

use crate::buffer::{GrayBuffer, PixelBuffer};
use crate::calibration::CalibrationPoints;
use crate::topics::Topic;

use super::band::{detect_band, ConfidenceBand};
use super::options::DetectOptions;
use super::roi::Roi;
use super::strategies::{default_strategies, ColumnContext, Probe, Strategy};

/// Everything learned about one topic column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScan {
    pub topic: Topic,
    /// `None` when the column lies outside the image.
    pub roi: Option<Roi>,
    /// Every strategy that ran, in order. Rejected probes are the
    /// low-confidence candidates.
    pub probes: Vec<Probe>,
    /// First probe that cleared its threshold.
    pub accepted: Option<Probe>,
    pub band: Option<ConfidenceBand>,
}

impl ColumnScan {
    /// Row of the accepted score line.
    pub fn y(&self) -> Option<usize> {
        self.accepted.and_then(|p| p.y)
    }

    /// Rejected probes that still pointed at a row.
    pub fn candidates(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter().filter(|p| !p.accepted && p.y.is_some())
    }
}

/// Finds each topic's score row by running an ordered strategy list.
pub struct ScoreLineDetector {
    options: DetectOptions,
    strategies: Vec<Box<dyn Strategy>>,
}

impl fmt::Debug for ScoreLineDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreLineDetector")
            .field("options", &self.options)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for ScoreLineDetector {
    fn default() -> Self {
        Self::new(DetectOptions::default())
    }
}

impl ScoreLineDetector {
    /// Detector with the standard four strategies.
    pub fn new(options: DetectOptions) -> Self {
        Self::with_strategies(options, default_strategies())
    }

    /// Detector with a custom strategy order.
    pub fn with_strategies(options: DetectOptions, strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            options,
            strategies,
        }
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    /// Scan one topic column. Never fails; an empty `accepted` means the
    /// topic is undetected.
    pub fn detect(
        &self,
        enhanced: &GrayBuffer,
        raw: &PixelBuffer,
        calibration: &CalibrationPoints,
        topic: Topic,
    ) -> ColumnScan {
        let roi = Roi::around(
            calibration.x_position(topic),
            calibration,
            enhanced.width(),
            enhanced.height(),
            &self.options,
        );
        let mut scan = ColumnScan {
            topic,
            roi,
            probes: Vec::new(),
            accepted: None,
            band: None,
        };
        let Some(roi) = roi else {
            return scan;
        };

        let ctx = ColumnContext {
            enhanced,
            raw,
            roi,
            calibration,
            options: &self.options,
        };
        for strategy in &self.strategies {
            let probe = strategy.probe(&ctx);
            scan.probes.push(probe);
            if probe.accepted && probe.y.is_some() {
                scan.accepted = Some(probe);
                break;
            }
        }

        if self.options.detect_band {
            scan.band = detect_band(raw, &roi);
        }
        scan
    }

    /// Scan every topic, in [`Topic::ALL`] order.
    pub fn detect_all(
        &self,
        enhanced: &GrayBuffer,
        raw: &PixelBuffer,
        calibration: &CalibrationPoints,
    ) -> Vec<ColumnScan> {
        Topic::ALL
            .into_iter()
            .map(|topic| self.detect(enhanced, raw, calibration, topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use crate::calibration::CalibrationSource;
    use crate::detect::strategies::{RedMarker, StrategyKind};

    fn calibration() -> CalibrationPoints {
        let xs = (0..10).map(|i| 30.0 + 60.0 * i as f64).collect();
        CalibrationPoints::new(60.0, 260.0, xs, CalibrationSource::Manual).unwrap()
    }

    #[test]
    fn test_stops_at_first_accepted() {
        let enhanced = GrayBuffer::from_fn(600, 320, |_, y| if y == 160 { 0 } else { 255 });
        let raw = PixelBuffer::filled(600, 320, Rgba::WHITE);
        let scan =
            ScoreLineDetector::default().detect(&enhanced, &raw, &calibration(), Topic::Economics);
        assert_eq!(scan.y(), Some(160));
        let kinds: Vec<StrategyKind> = scan.probes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![StrategyKind::HundredMarker, StrategyKind::DarkestLine]);
        assert_eq!(scan.accepted.map(|p| p.kind), Some(StrategyKind::DarkestLine));
    }

    #[test]
    fn test_blank_column_runs_every_strategy() {
        let enhanced = GrayBuffer::filled(600, 320, 255);
        let raw = PixelBuffer::filled(600, 320, Rgba::WHITE);
        let scan = ScoreLineDetector::default().detect(
            &enhanced,
            &raw,
            &calibration(),
            Topic::Derivatives,
        );
        assert_eq!(scan.y(), None);
        assert_eq!(scan.probes.len(), 4);
        assert_eq!(scan.band, None);
    }

    #[test]
    fn test_custom_strategy_order() {
        let enhanced = GrayBuffer::filled(600, 320, 255);
        let raw = PixelBuffer::from_fn(600, 320, |_, y| {
            if y == 200 {
                Rgba::rgb(230, 20, 20)
            } else {
                Rgba::WHITE
            }
        });
        let detector =
            ScoreLineDetector::with_strategies(DetectOptions::default(), vec![Box::new(RedMarker)]);
        let scan = detector.detect(&enhanced, &raw, &calibration(), Topic::FixedIncome);
        assert_eq!(scan.y(), Some(200));
        assert_eq!(scan.probes.len(), 1);
    }

    #[test]
    fn test_detect_all_keeps_topic_order() {
        let enhanced = GrayBuffer::filled(600, 320, 255);
        let raw = PixelBuffer::filled(600, 320, Rgba::WHITE);
        let scans = ScoreLineDetector::default().detect_all(&enhanced, &raw, &calibration());
        let topics: Vec<Topic> = scans.iter().map(|s| s.topic).collect();
        assert_eq!(topics, Topic::ALL.to_vec());
    }

    #[test]
    fn test_column_outside_image() {
        let xs = vec![5000.0; 10];
        let calibration =
            CalibrationPoints::new(10.0, 50.0, xs, CalibrationSource::Manual).unwrap();
        let scan = ScoreLineDetector::default().detect(
            &GrayBuffer::filled(100, 100, 255),
            &PixelBuffer::filled(100, 100, Rgba::WHITE),
            &calibration,
            Topic::Economics,
        );
        assert_eq!(scan.roi, None);
        assert!(scan.probes.is_empty());
    }
}
