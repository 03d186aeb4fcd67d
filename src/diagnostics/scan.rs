use crate::scan::ScaleLevel;
use serde::Serialize;

/// What happened on one scale level.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    #[serde(flatten)]
    pub level: ScaleLevel,
    pub windows_evaluated: usize,
    pub accepted: usize,
    /// Windows rejected at each stage index.
    pub rejections_by_stage: Vec<usize>,
    /// Windows whose variance was too small to normalize by.
    pub degenerate_windows: usize,
    pub elapsed_ms: f64,
}

impl LevelReport {
    /// Share of windows that never got past the first stage.
    pub fn first_stage_rejection_rate(&self) -> f64 {
        match (self.windows_evaluated, self.rejections_by_stage.first()) {
            (0, _) | (_, None) => 0.0,
            (n, Some(&r)) => r as f64 / n as f64,
        }
    }
}
