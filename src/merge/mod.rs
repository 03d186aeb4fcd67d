//! Greedy non-maximum suppression over raw detections.
//!
//! Detections are stably sorted by descending score (ties keep scan order),
//! then the best remaining detection is kept and everything overlapping it
//! with IoU ≥ `overlap_threshold` is dropped, until nothing remains. Kept
//! detections are pairwise below the threshold, so merging a merged set
//! returns it unchanged.

use crate::types::{DetectionSet, DetectionWindow};
use log::debug;
use serde::Serialize;

/// Counts describing one merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub raw: usize,
    pub kept: usize,
    pub suppressed: usize,
}

/// Collapse overlapping detections; `overlap_threshold` must lie in `(0, 1]`.
pub fn merge(raw: Vec<DetectionWindow>, overlap_threshold: f64) -> DetectionSet {
    merge_with_stats(raw, overlap_threshold).0
}

/// [`merge`] plus raw/kept counts.
pub fn merge_with_stats(
    mut raw: Vec<DetectionWindow>,
    overlap_threshold: f64,
) -> (DetectionSet, MergeStats) {
    debug_assert!(overlap_threshold > 0.0 && overlap_threshold <= 1.0);
    let total = raw.len();
    // `sort_by` is stable: equal scores stay in scan order.
    raw.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<DetectionWindow> = Vec::new();
    let mut suppressed = vec![false; raw.len()];
    for i in 0..raw.len() {
        if suppressed[i] {
            continue;
        }
        let best = raw[i];
        kept.push(best);
        for (j, other) in raw.iter().enumerate().skip(i + 1) {
            if !suppressed[j] && best.iou(other) >= overlap_threshold {
                suppressed[j] = true;
            }
        }
    }

    let stats = MergeStats {
        raw: total,
        kept: kept.len(),
        suppressed: total - kept.len(),
    };
    debug!(
        "merge: {} raw -> {} kept (iou >= {:.2})",
        stats.raw, stats.kept, overlap_threshold
    );
    (DetectionSet::from_sorted(kept), stats)
}
