use chart_scan::{AnalysisResult, CalibrationPoints, DebugPoint, Topic, TopicScore};
use serde::Serialize;
use std::fmt::Write as _;
use utoipa::ToSchema;

/// Score for one topic column.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreEntry {
    /// Topic label as printed on the chart
    pub topic: String,
    /// Score in percent (one decimal), absent when not detected
    pub percentage: Option<f64>,
    /// Row of the score marker in the submitted image
    pub y: Option<f64>,
    /// Top row of the confidence band
    pub range_top: Option<f64>,
    /// Bottom row of the confidence band
    pub range_bottom: Option<f64>,
    /// Strategy that located the marker
    pub strategy: Option<String>,
}

impl From<&TopicScore> for ScoreEntry {
    fn from(score: &TopicScore) -> Self {
        Self {
            topic: score.topic.label().to_string(),
            percentage: score.percentage,
            y: score.y,
            range_top: score.range_top,
            range_bottom: score.range_bottom,
            strategy: score.strategy.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReferenceLineReport {
    pub percentage: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GridReport {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Calibration the scores were mapped against, in image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalibrationReport {
    /// Where the calibration came from (template, detected-grid,
    /// grid-fallback or manual)
    pub source: String,
    pub y_hundred: f64,
    pub y_zero: f64,
    pub x_positions: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridReport>,
}

impl From<&CalibrationPoints> for CalibrationReport {
    fn from(c: &CalibrationPoints) -> Self {
        Self {
            source: c.source.as_str().to_string(),
            y_hundred: c.y_hundred,
            y_zero: c.y_zero,
            x_positions: c.x_positions.clone(),
            reference_lines: c
                .reference_lines
                .iter()
                .map(|r| ReferenceLineReport {
                    percentage: r.percentage,
                    y: r.y,
                })
                .collect(),
            grid: c.grid.map(|g| GridReport {
                left: g.left,
                top: g.top,
                right: g.right,
                bottom: g.bottom,
            }),
        }
    }
}

/// One probe position drawn on the debug image.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DebugPointReport {
    pub topic: String,
    pub x: f64,
    pub y: f64,
    pub score: Option<f64>,
    pub strategy: String,
    pub accepted: bool,
}

impl From<&DebugPoint> for DebugPointReport {
    fn from(p: &DebugPoint) -> Self {
        Self {
            topic: p.topic.label().to_string(),
            x: p.x,
            y: p.y,
            score: p.score,
            strategy: p.strategy.as_str().to_string(),
            accepted: p.accepted,
        }
    }
}

/// Serializable view of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalysisReport {
    pub width: usize,
    pub height: usize,
    /// Calibration mode that was requested
    pub mode: String,
    /// Upload scale factor the image matched, if any
    pub scale_factor: Option<f64>,
    /// Scores in chart order, always one entry per topic
    pub scores: Vec<ScoreEntry>,
    /// Number of topics with a score
    pub detected: usize,
    pub calibration: CalibrationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub debug_points: Vec<DebugPointReport>,
    /// Rendered debug overlay; the HTTP layer base64-encodes it
    #[serde(skip)]
    pub debug_image_png: Option<Vec<u8>>,
}

impl AnalysisReport {
    pub fn from_result(result: &AnalysisResult, mode: &str, scale_factor: Option<f64>) -> Self {
        Self {
            width: result.width,
            height: result.height,
            mode: mode.to_string(),
            scale_factor,
            scores: result.topics.iter().map(ScoreEntry::from).collect(),
            detected: result.detected_count(),
            calibration: CalibrationReport::from(&result.calibration),
            debug_points: result
                .debug
                .as_ref()
                .map(|d| d.points.iter().map(DebugPointReport::from).collect())
                .unwrap_or_default(),
            debug_image_png: None,
        }
    }

    /// Score for a topic label, if detected.
    pub fn score(&self, topic: &str) -> Option<f64> {
        let topic = Topic::from_label(topic)?;
        self.scores
            .iter()
            .find(|s| s.topic == topic.label())
            .and_then(|s| s.percentage)
    }

    /// Plain-text table for terminal output.
    pub fn format_table(&self) -> String {
        let label_width = self
            .scores
            .iter()
            .map(|s| s.topic.len())
            .max()
            .unwrap_or(5)
            .max(5);

        let mut out = String::new();
        let _ = writeln!(out, "{:<label_width$}  {:>7}  Strategy", "Topic", "Score");
        for entry in &self.scores {
            let score = entry
                .percentage
                .map(|p| format!("{p:.1}%"))
                .unwrap_or_else(|| "--".to_string());
            let strategy = entry.strategy.as_deref().unwrap_or("not detected");
            let _ = writeln!(out, "{:<label_width$}  {score:>7}  {strategy}", entry.topic);
        }
        let _ = writeln!(
            out,
            "\nDetected {}/{} topics ({}x{}, mode {}, calibration {})",
            self.detected,
            self.scores.len(),
            self.width,
            self.height,
            self.mode,
            self.calibration.source
        );
        out
    }
}
