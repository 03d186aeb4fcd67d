use super::{LevelReport, TimingBreakdown};
use crate::merge::MergeStats;
use crate::types::DetectionSet;
use serde::Serialize;

/// Result of [`CascadeDetector::detect_with_diagnostics`](crate::CascadeDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub detections: DetectionSet,
    pub input: InputDescriptor,
    pub levels: Vec<LevelReport>,
    pub skipped_levels: usize,
    pub merge: MergeStats,
    pub timings: TimingBreakdown,
}

impl DetectionReport {
    /// Windows evaluated across all levels.
    pub fn windows_evaluated(&self) -> usize {
        self.levels.iter().map(|l| l.windows_evaluated).sum()
    }

    /// One-line human summary, used by the CLI.
    pub fn summary(&self) -> String {
        format!(
            "{}x{}: {} levels, {} windows, {} raw -> {} detections in {:.2} ms",
            self.input.width,
            self.input.height,
            self.levels.len(),
            self.windows_evaluated(),
            self.merge.raw,
            self.merge.kept,
            self.timings.total_ms
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub window_width: u32,
    pub window_height: u32,
    pub stages: usize,
}
